//! 候选人报告写入服务 - 业务能力层
//!
//! 只负责"记录每个候选人的处理结果"，与主流程解耦：
//! 写入失败只打日志，不会影响压缩包的生成。

use anyhow::Result;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

/// 一条候选人报告
#[derive(Debug, Clone, Serialize)]
pub struct CandidateReport {
    pub batch: String,
    pub identifier: String,
    pub display_name: Option<String>,
    /// 最终文件名，未匹配到时为 `None`
    pub artifact: Option<String>,
    pub merged: bool,
    pub recorded_at: String,
}

/// 报告接收方
pub trait ReportSink: Send + Sync {
    fn record(&self, report: &CandidateReport) -> Result<()>;
}

/// 以 JSON Lines 追加写入文件
pub struct JsonlReportWriter {
    report_file_path: PathBuf,
}

impl JsonlReportWriter {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }
}

impl ReportSink for JsonlReportWriter {
    fn record(&self, report: &CandidateReport) -> Result<()> {
        debug!(
            "写入报告: 批次 {} | 候选人 {} | 文件: {:?}",
            report.batch, report.identifier, report.artifact
        );

        let mut line = serde_json::to_string(report)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)?;
        file.write_all(line.as_bytes())?;

        Ok(())
    }
}

/// 不记录任何内容
#[derive(Debug, Default)]
pub struct NoopReportSink;

impl ReportSink for NoopReportSink {
    fn record(&self, _report: &CandidateReport) -> Result<()> {
        Ok(())
    }
}

/// 逐条写入报告，失败只记录警告
pub fn record_all(sink: &dyn ReportSink, reports: &[CandidateReport]) -> usize {
    let mut written = 0;
    for report in reports {
        match sink.record(report) {
            Ok(()) => written += 1,
            Err(e) => warn!("⚠️ 候选人 {} 的报告写入失败: {}", report.identifier, e),
        }
    }
    written
}
