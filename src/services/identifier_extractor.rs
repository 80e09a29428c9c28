//! 文件名解析 - 业务能力层
//!
//! 从生成文件的文件名中恢复候选人编号和文档类型。
//! 解析规则以数据形式给出（保留词集合 + 编号正则），永不失败：
//! 无法识别的文件名返回 `Extraction::Unidentified`。

use crate::models::DocumentType;
use phf::phf_set;
use regex::Regex;
use std::sync::LazyLock;

/// 文件名分隔符
pub const TOKEN_DELIMITER: char = '_';

/// 已合并输出文件的标记
pub const MERGED_OUTPUT_INFIX: &str = "_merged.";

/// 不能作为候选人编号的保留词（小写比较）
static RESERVED_TOKENS: phf::Set<&'static str> = phf_set! {
    "type4",
    "type5",
    "merged",
    "certificate",
    "cert",
};

/// 回退到首个分段时额外排除的占位词
static PLACEHOLDER_TOKENS: phf::Set<&'static str> = phf_set! {
    "unknown",
};

/// 类型标记，按顺序匹配，先命中者优先
const TYPE_MARKERS: [(&str, DocumentType); 2] = [
    ("type4", DocumentType::Type4),
    ("type5", DocumentType::Type5),
];

static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]{3,50}$").expect("identifier pattern is valid"));

/// 文件名解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Identified {
        identifier: String,
        document_type: DocumentType,
    },
    Unidentified {
        document_type: DocumentType,
    },
}

impl Extraction {
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Extraction::Identified { identifier, .. } => Some(identifier),
            Extraction::Unidentified { .. } => None,
        }
    }

    pub fn document_type(&self) -> DocumentType {
        match self {
            Extraction::Identified { document_type, .. }
            | Extraction::Unidentified { document_type } => *document_type,
        }
    }

    pub fn into_parts(self) -> (Option<String>, DocumentType) {
        match self {
            Extraction::Identified {
                identifier,
                document_type,
            } => (Some(identifier), document_type),
            Extraction::Unidentified { document_type } => (None, document_type),
        }
    }
}

/// 解析文件名
///
/// 1. 去掉 `.pdf` 扩展名（大小写不敏感），按 `_` 分段
/// 2. 第一个符合编号格式且不是保留词的分段即为编号
/// 3. 否则回退到首个分段，除非它是保留词或占位词
pub fn extract(filename: &str) -> Extraction {
    let document_type = document_type_of(filename);
    let stem = strip_pdf_extension(filename);
    let tokens: Vec<&str> = stem.split(TOKEN_DELIMITER).collect();

    let identifier = tokens
        .iter()
        .find(|token| IDENTIFIER_PATTERN.is_match(token) && !is_reserved(token))
        .or_else(|| tokens.first().filter(|first| is_fallback_candidate(first)))
        .map(|token| token.to_string());

    match identifier {
        Some(identifier) => Extraction::Identified {
            identifier,
            document_type,
        },
        None => Extraction::Unidentified { document_type },
    }
}

/// 按类型标记判断文档类型（大小写不敏感的子串匹配）
pub fn document_type_of(filename: &str) -> DocumentType {
    let lower = filename.to_lowercase();
    TYPE_MARKERS
        .iter()
        .find(|(marker, _)| lower.contains(marker))
        .map(|(_, document_type)| *document_type)
        .unwrap_or(DocumentType::Other)
}

/// 是否为之前合并产生的文件
pub fn is_merge_output(filename: &str) -> bool {
    filename.contains(MERGED_OUTPUT_INFIX)
}

/// 是否为 PDF 文件名
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

fn strip_pdf_extension(filename: &str) -> &str {
    if is_pdf_filename(filename) {
        &filename[..filename.len() - 4]
    } else {
        filename
    }
}

fn is_reserved(token: &str) -> bool {
    RESERVED_TOKENS.contains(token.to_lowercase().as_str())
}

fn is_fallback_candidate(token: &str) -> bool {
    let lower = token.trim().to_lowercase();
    !lower.is_empty() && !RESERVED_TOKENS.contains(lower.as_str()) && !PLACEHOLDER_TOKENS.contains(lower.as_str())
}
