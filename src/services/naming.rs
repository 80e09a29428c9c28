//! 文件命名规则
//!
//! 磁盘上的合并文件名与压缩包条目名使用两套不同的字符集，
//! 下游可能依赖各自的格式，因此分开实现。

/// 没有候选人信息时合并文件使用的名称
pub const MERGED_PLACEHOLDER_NAME: &str = "Unknown";

/// 没有姓名时压缩包条目使用的名称
pub const ARCHIVE_PLACEHOLDER_NAME: &str = "Certificate";

/// 磁盘文件名清理：保留字母、数字、`-`、`_`、空格，其余替换为 `_`，再去掉首尾空白
pub fn sanitize_for_disk(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// 压缩包条目名清理：保留字母、数字、`.`、`-`，其余替换为 `_`
pub fn sanitize_for_archive(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// 合并文件名：`<姓名>_<编号>.pdf`
pub fn merged_file_name(display_name: Option<&str>, identifier: &str) -> String {
    let safe_name = display_name
        .map(sanitize_for_disk)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| MERGED_PLACEHOLDER_NAME.to_string());
    format!("{}_{}.pdf", safe_name, identifier)
}

/// 压缩包条目名：`<姓名>_<编号>.pdf`，缺少编号时用时间戳代替
pub fn archive_entry_name(display_name: Option<&str>, identifier: Option<&str>) -> String {
    let safe_name = display_name
        .map(sanitize_for_archive)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| ARCHIVE_PLACEHOLDER_NAME.to_string());

    // 编号来自候选人输入，路径分隔符等字符同样替换
    match identifier.filter(|id| !id.is_empty()) {
        Some(identifier) => format!("{}_{}.pdf", safe_name, sanitize_for_archive(identifier)),
        None => format!("{}_{}.pdf", safe_name, chrono::Utc::now().timestamp_millis()),
    }
}

/// 批次名称清理：保留字母、数字、`-`，其余替换为 `_`，为空时使用 `batch`
pub fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "batch".to_string()
    } else {
        cleaned
    }
}

/// 压缩包下载文件名
pub fn download_file_name() -> String {
    format!("certificates_{}.zip", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sanitizers_differ() {
        let name = "Jane O'Neil_Smith.Jr";
        assert_eq!(sanitize_for_disk(name), "Jane O_Neil_Smith_Jr");
        assert_eq!(sanitize_for_archive(name), "Jane_O_Neil_Smith.Jr");
    }

    #[test]
    fn test_disk_sanitizer_trims() {
        assert_eq!(sanitize_for_disk("  Ana María  "), "Ana Mar_a");
    }

    #[test]
    fn test_archive_entry_name() {
        assert_eq!(archive_entry_name(Some("Jane Doe"), Some("A")), "Jane_Doe_A.pdf");
        assert_eq!(archive_entry_name(None, Some("S001")), "Certificate_S001.pdf");
    }

    #[test]
    fn test_archive_entry_name_escapes_path_separators() {
        assert_eq!(archive_entry_name(Some("Jane"), Some("../x")), "Jane_.._x.pdf");
        assert_eq!(archive_entry_name(Some("Jane"), Some(r"a\b/c")), "Jane_a_b_c.pdf");
        assert!(!archive_entry_name(None, Some("/etc/passwd")).contains('/'));
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("batch a"), "batch_a");
        assert_eq!(sanitize_label("2024-06"), "2024-06");
        assert_eq!(sanitize_label(""), "batch");
    }

    #[test]
    fn test_archive_entry_name_without_identifier_uses_timestamp() {
        let name = archive_entry_name(Some("Jane"), None);
        assert!(name.starts_with("Jane_"));
        assert!(name.ends_with(".pdf"));
        let stamp = &name["Jane_".len()..name.len() - 4];
        assert!(stamp.parse::<i64>().is_ok());
    }

    #[test]
    fn test_merged_file_name_placeholder() {
        assert_eq!(merged_file_name(None, "S001"), "Unknown_S001.pdf");
        assert_eq!(merged_file_name(Some("   "), "S001"), "Unknown_S001.pdf");
        assert_eq!(merged_file_name(Some("%%%"), "S001"), "____S001.pdf");
        assert_eq!(merged_file_name(Some("Jane Doe"), "S001"), "Jane Doe_S001.pdf");
    }

    #[test]
    fn test_download_file_name() {
        let name = download_file_name();
        assert!(name.starts_with("certificates_"));
        assert!(name.ends_with(".zip"));
    }
}
