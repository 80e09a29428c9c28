//! 候选人最终文件匹配 - 业务能力层
//!
//! 为每个候选人选出唯一的最终文件：优先合并结果，其次单独文件。

use crate::models::{ArtifactFile, CandidateRecord, MergedArtifact};
use crate::services::identifier_extractor::is_merge_output;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// 最终文件的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedSource {
    Merged,
    Standalone,
}

/// 一个候选人的最终文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub identifier: String,
    pub display_name: Option<String>,
    pub path: PathBuf,
    pub source: ResolvedSource,
}

/// 匹配结果，顺序与候选人输入顺序一致
#[derive(Debug, Clone, Default)]
pub struct ResolvedArtifactSet {
    pub entries: Vec<ResolvedArtifact>,
    /// 有编号但没有找到文件的候选人
    pub unresolved: Vec<String>,
}

impl ResolvedArtifactSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedArtifact> {
        self.entries.iter()
    }

    pub fn find(&self, identifier: &str) -> Option<&ResolvedArtifact> {
        self.entries.iter().find(|e| e.identifier == identifier)
    }
}

/// 匹配候选人与文件
///
/// 对每个编号非空的候选人（按输入顺序）：
/// 1. 有合并结果则取合并结果
/// 2. 否则取第一个文件名包含该编号、或提取编号与之相等的单独文件
/// 3. 都没有则跳过该候选人
///
/// 已选过的文件不会再被选中，已合并输出（`_merged.`）不作为单独文件。
pub fn resolve(
    candidates: &[CandidateRecord],
    merged: &BTreeMap<String, MergedArtifact>,
    standalone: &[ArtifactFile],
) -> ResolvedArtifactSet {
    let mut used: HashSet<PathBuf> = HashSet::new();
    let mut resolved = ResolvedArtifactSet::default();

    for candidate in candidates {
        let Some(identifier) = candidate.identifier() else {
            continue;
        };

        let selected = merged
            .get(identifier)
            .filter(|m| !used.contains(&m.path))
            .map(|m| (m.path.clone(), ResolvedSource::Merged))
            .or_else(|| {
                find_standalone(identifier, standalone, &used)
                    .map(|a| (a.path.clone(), ResolvedSource::Standalone))
            });

        match selected {
            Some((path, source)) => {
                used.insert(path.clone());
                resolved.entries.push(ResolvedArtifact {
                    identifier: identifier.to_string(),
                    display_name: candidate.display_name().map(str::to_string),
                    path,
                    source,
                });
            }
            None => resolved.unresolved.push(identifier.to_string()),
        }
    }

    resolved
}

fn find_standalone<'a>(
    identifier: &str,
    standalone: &'a [ArtifactFile],
    used: &HashSet<PathBuf>,
) -> Option<&'a ArtifactFile> {
    standalone.iter().find(|artifact| {
        !is_merge_output(&artifact.raw_filename)
            && !used.contains(artifact.path())
            && (artifact.raw_filename.contains(identifier)
                || artifact.extracted_identifier.as_deref() == Some(identifier))
    })
}

/// 判断路径是否已被某个候选人选中
pub fn is_selected(resolved: &ResolvedArtifactSet, path: &Path) -> bool {
    resolved.entries.iter().any(|e| e.path == path)
}
