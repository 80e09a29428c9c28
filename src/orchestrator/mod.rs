//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批次调度和流水线编排，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量批次处理器
//! - 管理应用生命周期（日志文件、报告写入器）
//! - 扫描批次目录，加载候选人文件
//! - 控制并发数量（Semaphore）
//! - 为每个批次准备独立工作目录
//! - 输出压缩包和全局统计信息
//!
//! ### `bundle_processor` - 单个批次处理器
//! - 扫描目录，生成合并计划
//! - 逐组调用 GroupFlow 合并
//! - 为候选人选出文件并打包
//! - 写候选人报告
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理多个批次目录)
//!     ↓
//! bundle_processor (处理一个批次目录)
//!     ↓
//! workflow::GroupFlow (处理一个编号分组)
//!     ↓
//! services (能力层：解析 / 计划 / 匹配 / 打包 / 报告)
//!     ↓
//! infrastructure (基础设施：ArtifactStore / PdfMerger / BatchWorkspace)
//! ```

pub mod batch_processor;
pub mod bundle_processor;

// 重新导出主要类型
pub use batch_processor::{App, BundleSummary, ProcessingStats};
pub use bundle_processor::{
    batch_label, merge_directory, process_bundle, BundleOutcome, BundleProcessor, MergeOnlyOutcome,
    MergeReport,
};
