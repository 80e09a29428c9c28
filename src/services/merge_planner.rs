//! 分组与合并计划 - 业务能力层
//!
//! 按提取到的编号对文件分组，并判断每组是否包含一对可合并的
//! `type4` / `type5` 文件。只做计划，不碰磁盘。

use crate::models::{ArtifactFile, DocumentType};
use crate::services::identifier_extractor::is_merge_output;
use std::collections::BTreeMap;

/// 同一编号下的全部文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeGroup {
    pub identifier: String,
    /// 按扫描顺序
    pub members: Vec<ArtifactFile>,
}

/// 一组中用于合并的两个文件：先 `type4` 后 `type5`
#[derive(Debug, Clone, Copy)]
pub struct MergePair<'a> {
    pub first: &'a ArtifactFile,
    pub second: &'a ArtifactFile,
}

impl MergeGroup {
    /// 取第一个 `type4` 和第一个 `type5`（已合并的文件不参与）
    ///
    /// 重复的同类型文件保持原样，不参与合并也不会被删除。
    pub fn merge_pair(&self) -> Option<MergePair<'_>> {
        let first = self.first_of(DocumentType::Type4)?;
        let second = self.first_of(DocumentType::Type5)?;
        Some(MergePair { first, second })
    }

    pub fn is_mergeable(&self) -> bool {
        self.merge_pair().is_some()
    }

    fn first_of(&self, document_type: DocumentType) -> Option<&ArtifactFile> {
        self.members
            .iter()
            .find(|a| a.document_type == document_type && !is_merge_output(&a.raw_filename))
    }
}

/// 合并计划
#[derive(Debug, Clone, Default)]
pub struct MergePlan {
    /// 按编号排序的分组
    pub groups: Vec<MergeGroup>,
    /// 无法识别编号的文件，不参与分组
    pub unidentified: Vec<ArtifactFile>,
}

impl MergePlan {
    /// 可合并的分组
    pub fn mergeable(&self) -> impl Iterator<Item = (&MergeGroup, MergePair<'_>)> {
        self.groups
            .iter()
            .filter_map(|group| group.merge_pair().map(|pair| (group, pair)))
    }

    pub fn mergeable_count(&self) -> usize {
        self.mergeable().count()
    }

    pub fn group(&self, identifier: &str) -> Option<&MergeGroup> {
        self.groups.iter().find(|g| g.identifier == identifier)
    }
}

/// 生成合并计划
pub fn plan(artifacts: &[ArtifactFile]) -> MergePlan {
    let mut grouped: BTreeMap<&str, Vec<ArtifactFile>> = BTreeMap::new();
    let mut unidentified = Vec::new();

    for artifact in artifacts {
        match artifact.extracted_identifier.as_deref().map(str::trim) {
            Some(identifier) if !identifier.is_empty() => {
                grouped.entry(identifier).or_default().push(artifact.clone());
            }
            _ => unidentified.push(artifact.clone()),
        }
    }

    let groups = grouped
        .into_iter()
        .map(|(identifier, members)| MergeGroup {
            identifier: identifier.to_string(),
            members,
        })
        .collect();

    MergePlan {
        groups,
        unidentified,
    }
}
