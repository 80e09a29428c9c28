//! 文件目录访问 - 基础设施层
//!
//! 持有一个批次目录，只暴露"列出 PDF"和"删除文件"的能力。

use crate::error::{AppError, AppResult};
use crate::models::ArtifactFile;
use crate::services::identifier_extractor::{extract, is_pdf_filename};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 批次目录
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// 打开已存在的目录
    pub fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(AppError::directory_not_found(dir));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 列出目录中的所有 PDF，并解析文件名
    ///
    /// 按文件名排序，保证不同平台上扫描顺序一致。
    pub fn list_artifacts(&self) -> AppResult<Vec<ArtifactFile>> {
        let entries =
            std::fs::read_dir(&self.dir).map_err(|e| AppError::list_failed(&self.dir, e))?;

        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AppError::list_failed(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let raw_filename = entry.file_name().to_string_lossy().into_owned();
            if !is_pdf_filename(&raw_filename) {
                continue;
            }

            let (extracted_identifier, document_type) = extract(&raw_filename).into_parts();
            artifacts.push(ArtifactFile {
                path,
                raw_filename,
                extracted_identifier,
                document_type,
            });
        }

        artifacts.sort_by(|a, b| a.raw_filename.cmp(&b.raw_filename));
        debug!("{} 中找到 {} 个PDF文件", self.dir.display(), artifacts.len());
        Ok(artifacts)
    }

    /// 目标文件路径（位于本目录下）
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// 删除文件
    pub fn delete(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }
}
