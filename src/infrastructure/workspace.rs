//! 批次工作目录 - 基础设施层
//!
//! 每个批次在 `work_root` 下拥有独立的临时目录，并发批次互不可见。
//! 目录在 `BatchWorkspace` 释放时删除（除非设置保留）。

use crate::error::{AppError, AppResult, StorageError};
use crate::services::identifier_extractor::is_pdf_filename;
use crate::services::naming::sanitize_label;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

#[derive(Debug)]
enum WorkspaceDir {
    /// 释放时自动删除
    Scoped(TempDir),
    /// 处理完成后保留
    Kept(PathBuf),
}

/// 批次工作目录
#[derive(Debug)]
pub struct BatchWorkspace {
    dir: WorkspaceDir,
}

impl BatchWorkspace {
    /// 在 `work_root` 下创建唯一命名的工作目录：`<label>_<随机后缀>`
    pub fn create(work_root: &Path, label: &str, keep: bool) -> AppResult<Self> {
        let create_failed = |source: std::io::Error| StorageError::CreateDirFailed {
            path: work_root.to_path_buf(),
            source,
        };

        std::fs::create_dir_all(work_root).map_err(create_failed)?;
        let temp = tempfile::Builder::new()
            .prefix(&format!("{}_", sanitize_label(label)))
            .tempdir_in(work_root)
            .map_err(create_failed)?;
        debug!("创建工作目录: {}", temp.path().display());

        let dir = if keep {
            WorkspaceDir::Kept(temp.keep())
        } else {
            WorkspaceDir::Scoped(temp)
        };
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        match &self.dir {
            WorkspaceDir::Scoped(temp) => temp.path(),
            WorkspaceDir::Kept(path) => path,
        }
    }

    /// 把源目录中的 PDF 复制到工作目录，返回复制的文件数
    pub fn stage_from(&self, source_dir: &Path) -> AppResult<usize> {
        if !source_dir.is_dir() {
            return Err(AppError::directory_not_found(source_dir));
        }

        let entries =
            std::fs::read_dir(source_dir).map_err(|e| AppError::list_failed(source_dir, e))?;

        let mut copied = 0;
        for entry in entries {
            let entry = entry.map_err(|e| AppError::list_failed(source_dir, e))?;
            let from = entry.path();
            let file_name = entry.file_name();
            if !from.is_file() || !is_pdf_filename(&file_name.to_string_lossy()) {
                continue;
            }

            let to = self.path().join(&file_name);
            std::fs::copy(&from, &to).map_err(|source| StorageError::CopyFailed {
                from: from.clone(),
                to: to.clone(),
                source,
            })?;
            copied += 1;
        }

        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspaces_are_unique_and_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let first = BatchWorkspace::create(root.path(), "batch a", false).unwrap();
        let second = BatchWorkspace::create(root.path(), "batch a", false).unwrap();

        assert_ne!(first.path(), second.path());
        let name = first.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("batch_a_"));

        let first_path = first.path().to_path_buf();
        drop(first);
        assert!(!first_path.exists());
        assert!(second.path().exists());
    }

    #[test]
    fn test_keep_leaves_directory() {
        let root = tempfile::tempdir().unwrap();
        let workspace = BatchWorkspace::create(root.path(), "kept", true).unwrap();
        let path = workspace.path().to_path_buf();
        drop(workspace);
        assert!(path.exists());
    }

    #[test]
    fn test_missing_work_root_is_created() {
        let root = tempfile::tempdir().unwrap();
        let work_root = root.path().join("nested").join("work");
        let workspace = BatchWorkspace::create(&work_root, "b", false).unwrap();
        assert!(workspace.path().starts_with(&work_root));
    }

    #[test]
    fn test_stage_copies_only_pdfs() {
        let root = tempfile::tempdir().unwrap();
        let source = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("S001_type4.pdf"), b"a").unwrap();
        std::fs::write(source.path().join("candidates.toml"), b"").unwrap();

        let workspace = BatchWorkspace::create(root.path(), "b", false).unwrap();
        assert_eq!(workspace.stage_from(source.path()).unwrap(), 1);
        assert!(workspace.path().join("S001_type4.pdf").exists());
        assert!(!workspace.path().join("candidates.toml").exists());
        // 源目录保持不变
        assert!(source.path().join("S001_type4.pdf").exists());
    }
}
