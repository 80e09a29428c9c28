use anyhow::Result;
use certificate_bundle::{logger, App, Config};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "certificate_bundle")]
#[command(about = "合并证书 PDF 并按候选人打包", long_about = None)]
struct Cli {
    /// TOML 配置文件（缺省时读取环境变量）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 合并、匹配并打包一个批次目录
    Bundle {
        /// PDF 所在目录
        artifacts: PathBuf,
        /// 候选人文件（.toml 或 .json）
        candidates: PathBuf,
        /// 压缩包输出路径
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 仅合并目录中的 type4 / type5 文件
    Merge {
        dir: PathBuf,
    },
    /// 处理根目录下的所有批次子目录
    Batch {
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env(),
    };

    // 初始化日志
    logger::init(config.verbose_logging);

    let app = App::initialize(config)?;
    match cli.command {
        Commands::Bundle {
            artifacts,
            candidates,
            output,
        } => {
            let summary = app.run_bundle(&artifacts, &candidates, output).await?;
            info!("📦 压缩包已保存: {}", summary.archive_path.display());
        }
        Commands::Merge { dir } => {
            app.run_merge(&dir).await?;
        }
        Commands::Batch { root } => {
            let stats = app.run_batches(&root).await?;
            if stats.failed > 0 {
                anyhow::bail!("{}/{} 个批次处理失败", stats.failed, stats.total);
            }
        }
    }

    Ok(())
}
