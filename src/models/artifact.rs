use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// 文档类型标签
///
/// `Type4` 与 `Type5` 是同一份证书的两个互补部分，其余文件为 `Other`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DocumentType {
    Type4,
    Type5,
    Other,
}

impl DocumentType {
    /// 文件名中使用的标记
    pub fn tag(self) -> &'static str {
        match self {
            DocumentType::Type4 => "type4",
            DocumentType::Type5 => "type5",
            DocumentType::Other => "other",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// 磁盘上的一个生成文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub path: PathBuf,
    pub raw_filename: String,
    /// 从文件名中提取的候选人编号
    pub extracted_identifier: Option<String>,
    pub document_type: DocumentType,
}

impl ArtifactFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 合并生成的文件，取代两个源文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedArtifact {
    pub identifier: String,
    pub path: PathBuf,
}

impl MergedArtifact {
    /// 输出文件名
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
