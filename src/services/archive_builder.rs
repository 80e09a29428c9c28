//! 压缩包生成 - 业务能力层
//!
//! 将匹配结果按顺序写入一个 zip。条目时间戳固定，相同输入得到相同字节。
//! 任何一个文件读取失败都会使整个压缩包失败。

use crate::error::ArchiveError;
use crate::services::artifact_resolver::ResolvedArtifactSet;
use crate::services::naming::{archive_entry_name, download_file_name};
use std::collections::HashSet;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// 压缩包中的一个条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub identifier: String,
    pub size: u64,
}

/// 压缩包生成结果
#[derive(Debug, Clone)]
pub struct ArchiveResult {
    pub bytes: Vec<u8>,
    pub entries: Vec<ArchiveEntry>,
    /// 建议的下载文件名
    pub download_name: String,
}

/// 生成压缩包
pub fn build(resolved: &ResolvedArtifactSet) -> Result<ArchiveResult, ArchiveError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut taken: HashSet<String> = HashSet::new();
    let mut entries = Vec::with_capacity(resolved.len());

    for artifact in resolved.iter() {
        let content = std::fs::read(&artifact.path).map_err(|source| ArchiveError::ReadFailed {
            path: artifact.path.clone(),
            source,
        })?;

        let base_name = archive_entry_name(
            artifact.display_name.as_deref(),
            Some(artifact.identifier.as_str()),
        );
        let name = unique_name(&base_name, &mut taken);

        writer
            .start_file(name.as_str(), options)
            .map_err(|source| ArchiveError::EntryFailed {
                entry: name.clone(),
                source,
            })?;
        writer
            .write_all(&content)
            .map_err(|source| ArchiveError::WriteFailed {
                entry: name.clone(),
                source,
            })?;

        debug!("已加入压缩包: {} ({} 字节)", name, content.len());
        entries.push(ArchiveEntry {
            name,
            identifier: artifact.identifier.clone(),
            size: content.len() as u64,
        });
    }

    let bytes = writer
        .finish()
        .map_err(ArchiveError::FinishFailed)?
        .into_inner();

    Ok(ArchiveResult {
        bytes,
        entries,
        download_name: download_file_name(),
    })
}

/// 条目重名时在扩展名前追加 `_2`、`_3` ...
fn unique_name(base: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.to_string()) {
        return base.to_string();
    }

    let (stem, extension) = base.rsplit_once('.').unwrap_or((base, ""));
    let mut counter = 2;
    loop {
        let candidate = if extension.is_empty() {
            format!("{}_{}", stem, counter)
        } else {
            format!("{}_{}.{}", stem, counter, extension)
        };
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}
