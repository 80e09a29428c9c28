//! 批次处理上下文
//!
//! 封装"我正在处理哪个批次"这一信息，用于日志前缀

use std::fmt::Display;

/// 批次处理上下文
#[derive(Debug, Clone)]
pub struct BatchCtx {
    /// 批次名称（通常为目录名）
    pub label: String,

    /// 批次序号（仅用于日志显示，从1开始）
    pub batch_index: usize,
}

impl BatchCtx {
    pub fn new(label: impl Into<String>, batch_index: usize) -> Self {
        Self {
            label: label.into(),
            batch_index,
        }
    }
}

impl Display for BatchCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[批次 #{} {}]", self.batch_index, self.label)
    }
}
