use crate::error::{AppResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 程序配置文件
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 每个批次的工作目录根路径
    pub work_root: PathBuf,
    /// 压缩包输出目录
    pub output_dir: PathBuf,
    /// 同时处理的批次数量
    pub max_concurrent_batches: usize,
    /// 处理完成后是否保留批次工作目录
    pub keep_workspace: bool,
    /// 候选人报告文件（JSON Lines）
    pub report_file: PathBuf,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_root: PathBuf::from("work"),
            output_dir: PathBuf::from("output"),
            max_concurrent_batches: 4,
            keep_workspace: false,
            report_file: PathBuf::from("reports.jsonl"),
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            work_root: std::env::var("WORK_ROOT")
                .map(PathBuf::from)
                .unwrap_or(default.work_root),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.output_dir),
            max_concurrent_batches: std::env::var("MAX_CONCURRENT_BATCHES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(default.max_concurrent_batches),
            keep_workspace: std::env::var("KEEP_WORKSPACE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.keep_workspace),
            report_file: std::env::var("REPORT_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.report_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })?;
        if config.max_concurrent_batches == 0 {
            config.max_concurrent_batches = 1;
        }
        Ok(config)
    }
}
