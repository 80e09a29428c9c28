use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// 候选人记录
///
/// 由外部生成流程提供，本系统只读取 `identifier` 和 `display_name`，
/// 其余字段原样保留在 `extra` 中。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// 匹配用的候选人编号（SID）
    #[serde(default, alias = "sid", alias = "SID")]
    pub identifier: Option<String>,

    /// 候选人姓名，仅用于生成文件名
    #[serde(default, alias = "candidate_name", alias = "candidateName", alias = "name")]
    pub display_name: Option<String>,

    /// 其他生成元数据（不做处理）
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl CandidateRecord {
    pub fn new(identifier: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            display_name: Some(display_name.into()),
            extra: Map::new(),
        }
    }

    /// 去除首尾空白后的编号，空编号返回 `None`
    pub fn identifier(&self) -> Option<&str> {
        self.identifier
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// 去除首尾空白后的姓名，空姓名返回 `None`
    pub fn display_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
