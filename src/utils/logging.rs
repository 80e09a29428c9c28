use anyhow::Result;
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs;
use tracing::info;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n证书打包日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 追加一行到日志文件
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    use std::io::Write;
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        line
    )?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `max_concurrent`: 最大并发批次数
pub fn log_startup(max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 证书合并打包");
    info!("📊 最大并发批次数: {}", max_concurrent);
    info!("{}", "=".repeat(60));
}

/// 记录批次扫描结果
pub fn log_batches_found(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待处理的批次", total);
    info!("📋 最多同时处理 {} 个批次\n", max_concurrent);
}

/// 记录单个批次完成信息
///
/// # 参数
/// - `label`: 批次名称
/// - `merged`: 合并的文件对数
/// - `resolved`: 打包的候选人数
/// - `candidates`: 候选人总数
pub fn log_bundle_complete(label: &str, merged: usize, resolved: usize, candidates: usize) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 批次 {} 完成: 合并 {} 对, 打包 {}/{} 个候选人",
        label, merged, resolved, candidates
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功批次数
/// - `failed`: 失败批次数
/// - `merged`: 合并总对数
/// - `total`: 批次总数
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(success: usize, failed: usize, merged: usize, total: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("📎 合并: {} 对", merged);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}
