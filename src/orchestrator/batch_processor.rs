//! 批量批次处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责多个批次的调度和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化日志文件、报告写入器
//! 2. **批次扫描**：根目录下每个子目录是一个批次（PDF + 候选人文件）
//! 3. **并发控制**：使用 Semaphore 限制同时处理的批次数
//! 4. **目录隔离**：每个批次复制到独立的工作目录中处理
//! 5. **结果输出**：压缩包写入输出目录
//! 6. **全局统计**：汇总所有批次的处理结果
//!
//! 单个批次的流水线是同步的，放在 `spawn_blocking` 中执行。

use crate::config::Config;
use crate::error::InputError;
use crate::infrastructure::{BatchWorkspace, PdfMerger};
use crate::models::{find_candidate_file, load_candidates, CandidateRecord};
use crate::orchestrator::bundle_processor::{
    batch_label, BundleOutcome, BundleProcessor, MergeOnlyOutcome,
};
use crate::services::naming::sanitize_label;
use crate::services::report_writer::{JsonlReportWriter, NoopReportSink, ReportSink};
use crate::utils::logging::{
    append_log_line, init_log_file, log_batches_found, log_bundle_complete, log_startup,
    print_final_stats,
};
use crate::workflow::BatchCtx;
use anyhow::{Context, Result};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    reports: Arc<dyn ReportSink>,
}

/// 一个批次的输出摘要
#[derive(Debug, Clone)]
pub struct BundleSummary {
    pub label: String,
    pub archive_path: PathBuf,
    pub merged_count: usize,
    pub resolved_count: usize,
    pub candidate_count: usize,
}

/// 处理统计
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub merged: usize,
    pub total: usize,
}

impl App {
    /// 初始化应用（报告写入配置中的 JSON Lines 文件）
    pub fn initialize(config: Config) -> Result<Self> {
        let reports: Arc<dyn ReportSink> =
            Arc::new(JsonlReportWriter::with_path(config.report_file.clone()));
        Self::with_report_sink(config, reports)
    }

    /// 使用自定义报告写入器初始化
    pub fn with_report_sink(config: Config, reports: Arc<dyn ReportSink>) -> Result<Self> {
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法初始化日志文件: {}", config.output_log_file))?;
        log_startup(config.max_concurrent_batches);
        Ok(Self { config, reports })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 处理单个批次：PDF 目录 + 候选人文件 → 压缩包
    ///
    /// `output` 为空时写入配置的输出目录。
    pub async fn run_bundle(
        &self,
        artifacts_dir: &Path,
        candidates_file: &Path,
        output: Option<PathBuf>,
    ) -> Result<BundleSummary> {
        let candidates = load_candidates(candidates_file).await?;
        let ctx = BatchCtx::new(batch_label(artifacts_dir), 1);
        let summary = process_batch(
            &self.config,
            self.reports.clone(),
            artifacts_dir.to_path_buf(),
            candidates,
            ctx,
            output,
        )
        .await?;
        self.log_to_file(&format!(
            "批次 {} -> {}",
            summary.label,
            summary.archive_path.display()
        ));
        Ok(summary)
    }

    /// 仅合并：直接在给定目录中合并 type4 / type5
    pub async fn run_merge(&self, dir: &Path) -> Result<MergeOnlyOutcome> {
        let dir = dir.to_path_buf();
        let outcome = tokio::task::spawn_blocking(move || {
            let ctx = BatchCtx::new(batch_label(&dir), 1);
            BundleProcessor::new(&PdfMerger, &NoopReportSink)
                .merge_directory(&dir, &ctx)
        })
        .await
        .context("合并任务执行失败")??;

        info!("✓ 合并完成: {} 个新文件", outcome.merged_count());
        for name in &outcome.merged_files {
            info!("  📎 {}", name);
        }
        Ok(outcome)
    }

    /// 处理根目录下的所有批次子目录
    pub async fn run_batches(&self, root: &Path) -> Result<ProcessingStats> {
        let batch_dirs = scan_batch_dirs(root).await?;
        if batch_dirs.is_empty() {
            warn!("⚠️ 没有找到待处理的批次目录，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_batches_found(batch_dirs.len(), self.config.max_concurrent_batches);
        let stats = self.process_all_batches(batch_dirs).await?;
        print_final_stats(
            stats.success,
            stats.failed,
            stats.merged,
            stats.total,
            &self.config.output_log_file,
        );
        Ok(stats)
    }

    async fn process_all_batches(&self, batch_dirs: Vec<PathBuf>) -> Result<ProcessingStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_batches.max(1)));
        let mut handles = Vec::with_capacity(batch_dirs.len());

        for (idx, dir) in batch_dirs.into_iter().enumerate() {
            let permit = semaphore.clone().acquire_owned().await?;
            let config = self.config.clone();
            let reports = self.reports.clone();
            let ctx = BatchCtx::new(batch_label(&dir), idx + 1);

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let label = ctx.to_string();
                let result = async {
                    let candidates_file = find_candidate_file(&dir)
                        .await
                        .ok_or_else(|| InputError::MissingCandidateFile { dir: dir.clone() })?;
                    let candidates = load_candidates(&candidates_file).await?;
                    process_batch(&config, reports, dir, candidates, ctx, None).await
                }
                .await;
                if let Err(e) = &result {
                    error!("{} ❌ 处理失败: {:#}", label, e);
                }
                result
            }));
        }

        let mut stats = ProcessingStats {
            total: handles.len(),
            ..Default::default()
        };

        for joined in join_all(handles).await {
            match joined {
                Ok(Ok(summary)) => {
                    stats.success += 1;
                    stats.merged += summary.merged_count;
                    self.log_to_file(&format!(
                        "批次 {} -> {} (合并 {} 对, 打包 {}/{})",
                        summary.label,
                        summary.archive_path.display(),
                        summary.merged_count,
                        summary.resolved_count,
                        summary.candidate_count
                    ));
                }
                Ok(Err(e)) => {
                    stats.failed += 1;
                    self.log_to_file(&format!("批次失败: {:#}", e));
                }
                Err(e) => {
                    error!("批次任务执行失败: {}", e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }

    fn log_to_file(&self, line: &str) {
        if let Err(e) = append_log_line(&self.config.output_log_file, line) {
            warn!("写入日志文件失败: {}", e);
        }
    }
}

/// 在独立工作目录中处理一个批次，并把压缩包写到输出位置
async fn process_batch(
    config: &Config,
    reports: Arc<dyn ReportSink>,
    source_dir: PathBuf,
    candidates: Vec<CandidateRecord>,
    ctx: BatchCtx,
    output: Option<PathBuf>,
) -> Result<BundleSummary> {
    info!("{} 🚀 开始处理: {}", ctx, source_dir.display());

    let work_root = config.work_root.clone();
    let keep = config.keep_workspace;
    let blocking_ctx = ctx.clone();
    let outcome: BundleOutcome = tokio::task::spawn_blocking(move || {
        let workspace = BatchWorkspace::create(&work_root, &blocking_ctx.label, keep)?;
        let staged = workspace.stage_from(&source_dir)?;
        tracing::debug!("{} 已复制 {} 个PDF到工作目录", blocking_ctx, staged);

        BundleProcessor::new(&PdfMerger, reports.as_ref()).process_bundle(
            workspace.path(),
            &candidates,
            &blocking_ctx,
        )
    })
    .await
    .context("批次任务执行失败")??;

    let archive_path = match output {
        Some(path) => path,
        None => config
            .output_dir
            .join(format!("{}_{}", sanitize_label(&ctx.label), outcome.archive.download_name)),
    };
    if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("无法创建输出目录: {}", parent.display()))?;
    }
    tokio::fs::write(&archive_path, &outcome.archive.bytes)
        .await
        .with_context(|| format!("无法写入压缩包: {}", archive_path.display()))?;

    log_bundle_complete(
        &ctx.label,
        outcome.merged_count,
        outcome.resolved_count,
        outcome.candidate_count,
    );

    Ok(BundleSummary {
        label: ctx.label,
        archive_path,
        merged_count: outcome.merged_count,
        resolved_count: outcome.resolved_count,
        candidate_count: outcome.candidate_count,
    })
}

/// 根目录下的子目录（按名称排序）
async fn scan_batch_dirs(root: &Path) -> Result<Vec<PathBuf>> {
    info!("\n📁 正在扫描批次目录: {}", root.display());
    let mut entries = tokio::fs::read_dir(root)
        .await
        .with_context(|| format!("无法读取目录: {}", root.display()))?;

    let mut dirs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
