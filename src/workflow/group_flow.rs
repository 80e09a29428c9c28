//! 分组合并流程 - 流程层
//!
//! 核心职责：定义"一个编号分组"的完整合并流程
//!
//! 流程顺序：
//! 1. 计算合并文件名
//! 2. 合并 type4 + type5 → 写入并落盘
//! 3. 合并成功后删除两个源文件（删除失败只记录，不影响后续）
//!
//! 合并失败时两个源文件保持原样，作为单独文件继续参与匹配。

use crate::error::MergeError;
use crate::infrastructure::{ArtifactStore, DocumentMerger};
use crate::models::MergedArtifact;
use crate::services::merge_planner::{MergeGroup, MergePair};
use crate::services::naming::merged_file_name;
use crate::workflow::batch_ctx::BatchCtx;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 分组处理结果
#[derive(Debug)]
pub enum GroupOutcome {
    /// 合并成功
    Merged {
        artifact: MergedArtifact,
        /// 未能删除的源文件
        leftover: Vec<PathBuf>,
    },
    /// 合并失败，源文件保持不变
    Unmerged {
        identifier: String,
        error: MergeError,
    },
}

impl GroupOutcome {
    pub fn merged(&self) -> Option<&MergedArtifact> {
        match self {
            GroupOutcome::Merged { artifact, .. } => Some(artifact),
            GroupOutcome::Unmerged { .. } => None,
        }
    }
}

/// 分组合并流程
///
/// - 不认识压缩包和候选人列表
/// - 只依赖合并能力（DocumentMerger）和目录（ArtifactStore）
pub struct GroupFlow<'a> {
    merger: &'a dyn DocumentMerger,
    store: &'a ArtifactStore,
}

impl<'a> GroupFlow<'a> {
    pub fn new(merger: &'a dyn DocumentMerger, store: &'a ArtifactStore) -> Self {
        Self { merger, store }
    }

    /// 合并一个分组
    ///
    /// `display_name` 为候选人姓名，没有时合并文件使用占位名称。
    pub fn run(
        &self,
        group: &MergeGroup,
        pair: MergePair<'_>,
        display_name: Option<&str>,
        ctx: &BatchCtx,
    ) -> GroupOutcome {
        let identifier = group.identifier.as_str();
        let destination = self
            .store
            .path_for(&merged_file_name(display_name, identifier));

        let merged_path = match self
            .merger
            .merge(pair.first.path(), pair.second.path(), &destination)
        {
            Ok(path) => path,
            Err(e) => {
                error!("{} ❌ 编号 {} 合并失败: {}", ctx, identifier, e);
                return GroupOutcome::Unmerged {
                    identifier: identifier.to_string(),
                    error: e,
                };
            }
        };

        let artifact = MergedArtifact {
            identifier: identifier.to_string(),
            path: merged_path,
        };
        info!(
            "{} ✓ 编号 {} 已合并: {}",
            ctx,
            identifier,
            artifact.file_name()
        );

        let mut leftover = Vec::new();
        for source in [pair.first, pair.second] {
            if let Err(e) = self.store.delete(source.path()) {
                warn!(
                    "{} ⚠️ 删除源文件失败 ({}): {}",
                    ctx, source.raw_filename, e
                );
                leftover.push(source.path.clone());
            }
        }

        GroupOutcome::Merged { artifact, leftover }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::PdfMerger;
    use crate::services::merge_planner::plan;
    use crate::test_support::{page_widths, write_sample_pdf};
    use std::path::Path;

    struct FailingMerger;

    impl DocumentMerger for FailingMerger {
        fn merge(&self, first: &Path, _second: &Path, _destination: &Path) -> Result<PathBuf, MergeError> {
            Err(MergeError::InvalidDocument {
                path: first.to_path_buf(),
                reason: "corrupt".to_string(),
            })
        }
    }

    /// 合并后把第一个源文件提前删掉，使后续删除失败
    struct VanishingSourceMerger;

    impl DocumentMerger for VanishingSourceMerger {
        fn merge(&self, first: &Path, second: &Path, destination: &Path) -> Result<PathBuf, MergeError> {
            let merged = PdfMerger.merge(first, second, destination)?;
            std::fs::remove_file(first).unwrap();
            Ok(merged)
        }
    }

    #[test]
    fn test_failed_source_delete_is_reported_as_leftover() {
        let dir = tempfile::tempdir().unwrap();
        write_sample_pdf(dir.path(), "S001_type4.pdf", &[100]);
        write_sample_pdf(dir.path(), "S001_type5.pdf", &[200]);

        let store = ArtifactStore::open(dir.path()).unwrap();
        let plan = plan(&store.list_artifacts().unwrap());
        let (group, pair) = plan.mergeable().next().unwrap();

        let flow = GroupFlow::new(&VanishingSourceMerger, &store);
        match flow.run(group, pair, Some("Ann"), &BatchCtx::new("test", 1)) {
            GroupOutcome::Merged { artifact, leftover } => {
                assert_eq!(leftover, vec![dir.path().join("S001_type4.pdf")]);
                assert!(artifact.path.exists());
                // 第二个源文件仍然正常删除
                assert!(!dir.path().join("S001_type5.pdf").exists());
            }
            other => panic!("expected merged outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_then_delete_sources() {
        let dir = tempfile::tempdir().unwrap();
        write_sample_pdf(dir.path(), "S001_type4.pdf", &[100]);
        write_sample_pdf(dir.path(), "S001_type5.pdf", &[200]);

        let store = ArtifactStore::open(dir.path()).unwrap();
        let plan = plan(&store.list_artifacts().unwrap());
        let (group, pair) = plan.mergeable().next().unwrap();

        let merger = PdfMerger::new();
        let flow = GroupFlow::new(&merger, &store);
        let outcome = flow.run(group, pair, Some("Jane Doe"), &BatchCtx::new("test", 1));

        let merged = outcome.merged().unwrap();
        assert_eq!(merged.file_name(), "Jane Doe_S001.pdf");
        assert_eq!(page_widths(&merged.path), vec![100, 200]);
        assert!(!dir.path().join("S001_type4.pdf").exists());
        assert!(!dir.path().join("S001_type5.pdf").exists());
    }

    #[test]
    fn test_failed_merge_keeps_sources() {
        let dir = tempfile::tempdir().unwrap();
        write_sample_pdf(dir.path(), "S001_type4.pdf", &[100]);
        write_sample_pdf(dir.path(), "S001_type5.pdf", &[200]);

        let store = ArtifactStore::open(dir.path()).unwrap();
        let plan = plan(&store.list_artifacts().unwrap());
        let (group, pair) = plan.mergeable().next().unwrap();

        let flow = GroupFlow::new(&FailingMerger, &store);
        let outcome = flow.run(group, pair, None, &BatchCtx::new("test", 1));

        assert!(matches!(outcome, GroupOutcome::Unmerged { .. }));
        assert!(dir.path().join("S001_type4.pdf").exists());
        assert!(dir.path().join("S001_type5.pdf").exists());
    }
}
