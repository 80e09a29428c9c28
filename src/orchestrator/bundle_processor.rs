//! 单个批次处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责一个批次目录的完整流水线，是批次级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **扫描目录**：列出 PDF 并解析文件名
//! 2. **合并计划**：按编号分组，找出可合并的 type4 / type5
//! 3. **逐组合并**：委托 `GroupFlow`，单组失败不影响其他分组
//! 4. **匹配候选人**：为每个候选人选出最终文件
//! 5. **写报告**：旁路记录，失败不影响结果
//! 6. **打包**：生成 zip 字节
//!
//! 批次内部严格串行，保证顺序确定、"先合并后删除"。

use crate::error::{AppError, AppResult};
use crate::infrastructure::{ArtifactStore, DocumentMerger, PdfMerger};
use crate::models::{ArtifactFile, CandidateRecord, MergedArtifact};
use crate::services::archive_builder::{self, ArchiveResult};
use crate::services::artifact_resolver::{self, is_selected, ResolvedArtifactSet, ResolvedSource};
use crate::services::candidate_index::CandidateIndex;
use crate::services::merge_planner::{self, MergePlan};
use crate::services::report_writer::{record_all, CandidateReport, NoopReportSink, ReportSink};
use crate::workflow::{BatchCtx, GroupFlow, GroupOutcome};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 合并阶段结果
#[derive(Debug, Default)]
pub struct MergeReport {
    /// 编号 -> 合并文件
    pub merged: BTreeMap<String, MergedArtifact>,
    /// 合并失败的编号
    pub failed: Vec<String>,
    /// 合并成功但未能删除的源文件
    pub leftover: Vec<PathBuf>,
}

impl MergeReport {
    pub fn merged_count(&self) -> usize {
        self.merged.len()
    }
}

/// 完整流水线的结果
#[derive(Debug)]
pub struct BundleOutcome {
    pub archive: ArchiveResult,
    pub merged_count: usize,
    pub failed_merges: usize,
    pub resolved_count: usize,
    /// 编号非空的候选人数
    pub candidate_count: usize,
    /// 未找到文件的候选人编号
    pub unresolved: Vec<String>,
}

/// 仅合并模式的结果
#[derive(Debug, Default)]
pub struct MergeOnlyOutcome {
    /// 新生成的合并文件名
    pub merged_files: Vec<String>,
    pub failed_merges: usize,
}

impl MergeOnlyOutcome {
    pub fn merged_count(&self) -> usize {
        self.merged_files.len()
    }
}

/// 单个批次处理器
pub struct BundleProcessor<'a> {
    merger: &'a dyn DocumentMerger,
    reports: &'a dyn ReportSink,
}

impl<'a> BundleProcessor<'a> {
    pub fn new(merger: &'a dyn DocumentMerger, reports: &'a dyn ReportSink) -> Self {
        Self { merger, reports }
    }

    /// 合并、匹配并打包一个批次目录
    pub fn process_bundle(
        &self,
        dir: &Path,
        candidates: &[CandidateRecord],
        ctx: &BatchCtx,
    ) -> AppResult<BundleOutcome> {
        let store = ArtifactStore::open(dir)?;
        let artifacts = store.list_artifacts()?;
        if artifacts.is_empty() {
            warn!("{} ⚠️ 目录中没有PDF文件", ctx);
            return Err(AppError::no_artifacts(dir));
        }

        let index = CandidateIndex::build(candidates);
        info!(
            "{} 📄 {} 个PDF文件, {} 个有效候选人",
            ctx,
            artifacts.len(),
            index.len()
        );

        let plan = merge_planner::plan(&artifacts);
        let merge_report = self.merge_groups(&store, &plan, Some(&index), ctx);

        let standalone = self.standalone_after_merge(&store, artifacts, &merge_report, ctx);
        let resolved = artifact_resolver::resolve(candidates, &merge_report.merged, &standalone);

        let unused = standalone
            .iter()
            .filter(|a| !is_selected(&resolved, a.path()))
            .count();
        debug!("{} {} 个单独文件未被任何候选人选中", ctx, unused);

        self.record_reports(&resolved, &index, ctx);

        if resolved.is_empty() {
            warn!("{} ⚠️ 没有候选人匹配到文件", ctx);
            return Err(AppError::nothing_resolved(index.len()));
        }

        info!(
            "{} 🔗 匹配完成: {}/{} 个候选人",
            ctx,
            resolved.len(),
            index.len()
        );

        let archive = archive_builder::build(&resolved)?;
        info!(
            "{} 📦 压缩包已生成: {} 个条目, {} 字节",
            ctx,
            archive.entries.len(),
            archive.bytes.len()
        );

        Ok(BundleOutcome {
            merged_count: merge_report.merged_count(),
            failed_merges: merge_report.failed.len(),
            resolved_count: resolved.len(),
            candidate_count: index.len(),
            unresolved: resolved.unresolved,
            archive,
        })
    }

    /// 仅合并：不读取候选人，也不打包
    ///
    /// 合并文件使用占位名称。重复执行不会再次合并已合并的文件。
    pub fn merge_directory(&self, dir: &Path, ctx: &BatchCtx) -> AppResult<MergeOnlyOutcome> {
        let store = ArtifactStore::open(dir)?;
        let artifacts = store.list_artifacts()?;
        if artifacts.is_empty() {
            info!("{} 目录中没有PDF文件，无需合并", ctx);
            return Ok(MergeOnlyOutcome::default());
        }

        let plan = merge_planner::plan(&artifacts);
        let report = self.merge_groups(&store, &plan, None, ctx);

        Ok(MergeOnlyOutcome {
            merged_files: report.merged.values().map(MergedArtifact::file_name).collect(),
            failed_merges: report.failed.len(),
        })
    }

    /// 逐组合并，单组失败只记录
    fn merge_groups(
        &self,
        store: &ArtifactStore,
        plan: &MergePlan,
        index: Option<&CandidateIndex<'_>>,
        ctx: &BatchCtx,
    ) -> MergeReport {
        info!(
            "{} 🔍 {} 个编号分组, 其中 {} 组可合并 ({} 个文件无法识别编号)",
            ctx,
            plan.groups.len(),
            plan.mergeable_count(),
            plan.unidentified.len()
        );

        let flow = GroupFlow::new(self.merger, store);
        let mut report = MergeReport::default();

        for (group, pair) in plan.mergeable() {
            let display_name = index.and_then(|i| i.display_name(&group.identifier));
            match flow.run(group, pair, display_name, ctx) {
                GroupOutcome::Merged { artifact, leftover } => {
                    report.leftover.extend(leftover);
                    report.merged.insert(artifact.identifier.clone(), artifact);
                }
                GroupOutcome::Unmerged { identifier, .. } => report.failed.push(identifier),
            }
        }

        info!(
            "{} ✓ 成功合并 {} 对, 失败 {} 组",
            ctx,
            report.merged_count(),
            report.failed.len()
        );
        report
    }

    /// 合并后重新扫描目录，得到单独文件列表（不含本次的合并结果）
    ///
    /// 重新扫描失败时退回到合并前的列表，去掉已被删除的文件。
    fn standalone_after_merge(
        &self,
        store: &ArtifactStore,
        before: Vec<ArtifactFile>,
        report: &MergeReport,
        ctx: &BatchCtx,
    ) -> Vec<ArtifactFile> {
        let merged_paths: HashSet<&Path> =
            report.merged.values().map(|m| m.path.as_path()).collect();

        let listed = match store.list_artifacts() {
            Ok(listed) => listed,
            Err(e) => {
                warn!("{} ⚠️ 合并后重新扫描失败，使用合并前的列表: {}", ctx, e);
                before.into_iter().filter(|a| a.path.exists()).collect()
            }
        };

        listed
            .into_iter()
            .filter(|a| !merged_paths.contains(a.path()))
            .collect()
    }

    fn record_reports(&self, resolved: &ResolvedArtifactSet, index: &CandidateIndex<'_>, ctx: &BatchCtx) {
        let recorded_at = chrono::Local::now().to_rfc3339();

        let found = resolved.iter().map(|entry| CandidateReport {
            batch: ctx.label.clone(),
            identifier: entry.identifier.clone(),
            display_name: entry.display_name.clone(),
            artifact: entry
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned()),
            merged: entry.source == ResolvedSource::Merged,
            recorded_at: recorded_at.clone(),
        });
        let missing = resolved.unresolved.iter().map(|identifier| CandidateReport {
            batch: ctx.label.clone(),
            identifier: identifier.clone(),
            display_name: index.display_name(identifier).map(str::to_string),
            artifact: None,
            merged: false,
            recorded_at: recorded_at.clone(),
        });

        let reports: Vec<_> = found.chain(missing).collect();
        let written = record_all(self.reports, &reports);
        debug!("{} 已写入 {}/{} 条候选人报告", ctx, written, reports.len());
    }
}

/// 使用默认合并器处理一个批次目录（不写报告）
pub fn process_bundle(dir: &Path, candidates: &[CandidateRecord]) -> AppResult<BundleOutcome> {
    let ctx = BatchCtx::new(batch_label(dir), 1);
    BundleProcessor::new(&PdfMerger, &NoopReportSink).process_bundle(dir, candidates, &ctx)
}

/// 使用默认合并器对目录执行仅合并
pub fn merge_directory(dir: &Path) -> AppResult<MergeOnlyOutcome> {
    let ctx = BatchCtx::new(batch_label(dir), 1);
    BundleProcessor::new(&PdfMerger, &NoopReportSink).merge_directory(dir, &ctx)
}

/// 目录名作为批次名称
pub fn batch_label(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "batch".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EmptyResultError, MergeError};
    use crate::test_support::write_sample_pdf;

    struct FailFor(&'static str);

    impl DocumentMerger for FailFor {
        fn merge(&self, first: &Path, second: &Path, destination: &Path) -> Result<PathBuf, MergeError> {
            if first.to_string_lossy().contains(self.0) {
                return Err(MergeError::NoPages {
                    path: first.to_path_buf(),
                });
            }
            PdfMerger.merge(first, second, destination)
        }
    }

    #[test]
    fn test_one_failed_group_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        for id in ["S001", "S002"] {
            write_sample_pdf(dir.path(), &format!("{}_type4.pdf", id), &[100]);
            write_sample_pdf(dir.path(), &format!("{}_type5.pdf", id), &[200]);
        }
        let candidates = vec![
            CandidateRecord::new("S001", "Alice"),
            CandidateRecord::new("S002", "Bob"),
        ];

        let merger = FailFor("S001");
        let processor = BundleProcessor::new(&merger, &NoopReportSink);
        let outcome = processor
            .process_bundle(dir.path(), &candidates, &BatchCtx::new("t", 1))
            .unwrap();

        assert_eq!(outcome.merged_count, 1);
        assert_eq!(outcome.failed_merges, 1);
        assert_eq!(outcome.resolved_count, 2);
        // S001 的源文件保留，作为单独文件被选中
        assert!(dir.path().join("S001_type4.pdf").exists());
        let names: Vec<_> = outcome.archive.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alice_S001.pdf", "Bob_S002.pdf"]);
    }

    struct VanishingSource;

    impl DocumentMerger for VanishingSource {
        fn merge(&self, first: &Path, second: &Path, destination: &Path) -> Result<PathBuf, MergeError> {
            let merged = PdfMerger.merge(first, second, destination)?;
            std::fs::remove_file(first).unwrap();
            Ok(merged)
        }
    }

    #[test]
    fn test_source_delete_failure_still_archives() {
        let dir = tempfile::tempdir().unwrap();
        write_sample_pdf(dir.path(), "S001_type4.pdf", &[100]);
        write_sample_pdf(dir.path(), "S001_type5.pdf", &[200]);

        let processor = BundleProcessor::new(&VanishingSource, &NoopReportSink);
        let outcome = processor
            .process_bundle(
                dir.path(),
                &[CandidateRecord::new("S001", "A")],
                &BatchCtx::new("t", 1),
            )
            .unwrap();

        assert_eq!(outcome.merged_count, 1);
        let names: Vec<_> = outcome.archive.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A_S001.pdf"]);
    }

    #[test]
    fn test_empty_directory_is_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let err = process_bundle(dir.path(), &[CandidateRecord::new("S001", "A")]).unwrap_err();
        assert!(matches!(err, AppError::Empty(EmptyResultError::NoArtifacts { .. })));
    }

    #[test]
    fn test_nothing_resolved_is_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        write_sample_pdf(dir.path(), "S001_type4.pdf", &[100]);

        let err = process_bundle(dir.path(), &[CandidateRecord::new("S999", "A")]).unwrap_err();
        assert!(matches!(
            err,
            AppError::Empty(EmptyResultError::NothingResolved { candidates: 1 })
        ));
    }

    #[test]
    fn test_merge_directory_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = merge_directory(&dir.path().join("missing")).unwrap_err();
        assert!(!err.is_empty_result());
    }

    #[test]
    fn test_reports_cover_found_and_missing_candidates() {
        use crate::services::report_writer::JsonlReportWriter;

        let dir = tempfile::tempdir().unwrap();
        let report_dir = tempfile::tempdir().unwrap();
        write_sample_pdf(dir.path(), "S001_type4.pdf", &[100]);
        let report_path = report_dir.path().join("reports.jsonl");
        let writer = JsonlReportWriter::with_path(&report_path);

        let candidates = vec![
            CandidateRecord::new("S001", "Alice"),
            CandidateRecord::new("S404", "Ghost"),
        ];
        let processor = BundleProcessor::new(&PdfMerger, &writer);
        let outcome = processor
            .process_bundle(dir.path(), &candidates, &BatchCtx::new("t", 1))
            .unwrap();
        assert_eq!(outcome.unresolved, vec!["S404".to_string()]);

        let content = std::fs::read_to_string(&report_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"artifact\":null"));
    }
}
