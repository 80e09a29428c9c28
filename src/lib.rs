//! # Certificate Bundle
//!
//! 证书 PDF 合并与打包工具
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有文件系统资源，只暴露能力
//! - `ArtifactStore` - 批次目录的扫描与删除
//! - `PdfMerger` - 两个 PDF 合并为一个
//! - `BatchWorkspace` - 批次独立工作目录
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心批次
//! - `identifier_extractor` - 从文件名解析编号和类型
//! - `merge_planner` - 按编号分组，找出可合并的文件对
//! - `artifact_resolver` - 为候选人选出最终文件
//! - `archive_builder` - 生成 zip 字节
//! - `report_writer` - 写候选人报告
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个编号分组"的合并流程
//! - `BatchCtx` - 上下文封装（批次名称 + 序号）
//! - `GroupFlow` - 合并 → 删除源文件
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量批次处理器，管理并发和工作目录
//! - `orchestrator/bundle_processor` - 单个批次处理器，合并 → 匹配 → 打包
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod test_support;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{ArtifactStore, DocumentMerger, PdfMerger};
pub use models::{ArtifactFile, CandidateRecord, DocumentType, MergedArtifact};
pub use orchestrator::{merge_directory, process_bundle, App, BundleOutcome, BundleProcessor};
pub use services::{ArchiveResult, Extraction};
pub use workflow::{BatchCtx, GroupFlow, GroupOutcome};
