use crate::error::{AppResult, InputError};
use crate::models::candidate::CandidateRecord;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 批次目录中约定的候选人文件名（按优先级）
const CANDIDATE_FILE_NAMES: [&str; 2] = ["candidates.toml", "candidates.json"];

#[derive(Debug, Deserialize)]
struct CandidateFile {
    #[serde(default)]
    candidates: Vec<CandidateRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonCandidates {
    List(Vec<CandidateRecord>),
    Wrapped(CandidateFile),
}

/// 从文件加载候选人列表，保持文件中的顺序
pub async fn load_candidates(path: &Path) -> AppResult<Vec<CandidateRecord>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| InputError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

    let candidates = parse_candidates(path, &content)?;
    tracing::info!(
        "成功加载 {} 个候选人: {}",
        candidates.len(),
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(candidates)
}

/// 按扩展名解析候选人内容（`.toml` 或 `.json`）
pub fn parse_candidates(path: &Path, content: &str) -> AppResult<Vec<CandidateRecord>> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("toml") => {
            let file: CandidateFile =
                toml::from_str(content).map_err(|source| InputError::TomlParseFailed {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(file.candidates)
        }
        Some("json") => {
            let parsed: JsonCandidates =
                serde_json::from_str(content).map_err(|source| InputError::JsonParseFailed {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(match parsed {
                JsonCandidates::List(list) => list,
                JsonCandidates::Wrapped(file) => file.candidates,
            })
        }
        _ => Err(InputError::UnsupportedFormat {
            path: path.to_path_buf(),
        }
        .into()),
    }
}

/// 在批次目录中查找候选人文件
pub async fn find_candidate_file(dir: &Path) -> Option<PathBuf> {
    for name in CANDIDATE_FILE_NAMES {
        let path = dir.join(name);
        if fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false) {
            return Some(path);
        }
    }
    None
}
