use std::fmt;
use std::path::PathBuf;

/// 应用程序错误类型
///
/// 每个变体对应流水线的一个阶段，调用方只会收到一个结构化错误。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 目录/文件存储错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 候选人输入错误
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
    /// PDF 合并错误
    #[error("合并错误: {0}")]
    Merge(#[from] MergeError),
    /// 打包错误
    #[error("打包错误: {0}")]
    Archive(#[from] ArchiveError),
    /// 没有可用的结果
    #[error("结果为空: {0}")]
    Empty(#[from] EmptyResultError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 出错的流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// 扫描目录
    Discovery,
    /// 读取候选人
    Input,
    /// 合并 PDF
    Merge,
    /// 匹配候选人与文件
    Resolution,
    /// 生成压缩包
    Archive,
    /// 加载配置
    Configuration,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discovery => "discovery",
            Stage::Input => "input",
            Stage::Merge => "merge",
            Stage::Resolution => "resolution",
            Stage::Archive => "archive",
            Stage::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

impl AppError {
    /// 返回失败所在的阶段
    pub fn stage(&self) -> Stage {
        match self {
            AppError::Storage(_) => Stage::Discovery,
            AppError::Input(_) => Stage::Input,
            AppError::Merge(_) => Stage::Merge,
            AppError::Archive(_) => Stage::Archive,
            AppError::Empty(EmptyResultError::NoArtifacts { .. }) => Stage::Discovery,
            AppError::Empty(EmptyResultError::NothingResolved { .. }) => Stage::Resolution,
            AppError::Config(_) => Stage::Configuration,
        }
    }

    /// 是否为"空结果"类错误（区别于 I/O 失败）
    pub fn is_empty_result(&self) -> bool {
        matches!(self, AppError::Empty(_))
    }
}

/// 存储相关错误
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// 目录不存在
    #[error("目录不存在: {}", path.display())]
    DirectoryNotFound { path: PathBuf },
    /// 读取目录失败
    #[error("读取目录失败 ({}): {source}", path.display())]
    ListFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 创建目录失败
    #[error("创建目录失败 ({}): {source}", path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 复制文件失败
    #[error("复制文件失败 ({} -> {}): {source}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 候选人输入错误
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// 读取文件失败
    #[error("读取候选人文件失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({}): {source}", path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({}): {source}", path.display())]
    JsonParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// 不支持的文件格式
    #[error("不支持的候选人文件格式: {}", path.display())]
    UnsupportedFormat { path: PathBuf },
    /// 批次目录中没有候选人文件
    #[error("目录中没有候选人文件: {}", dir.display())]
    MissingCandidateFile { dir: PathBuf },
}

/// PDF 合并错误
///
/// 只影响单个分组，编排层捕获后跳过该分组。
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// 读取源文件失败
    #[error("读取源文件失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 源文件不是有效的 PDF
    #[error("无效的PDF文件 ({}): {reason}", path.display())]
    InvalidDocument { path: PathBuf, reason: String },
    /// 源文件没有页面
    #[error("PDF文件没有页面: {}", path.display())]
    NoPages { path: PathBuf },
    /// 合并结果缺少目录对象
    #[error("合并结果缺少 Catalog 或 Pages 对象")]
    MissingCatalog,
    /// 目标路径与源文件相同
    #[error("目标路径与源文件相同: {}", path.display())]
    DestinationIsSource { path: PathBuf },
    /// 序列化失败
    #[error("序列化合并结果失败: {reason}")]
    SerializeFailed { reason: String },
    /// 写入目标文件失败
    #[error("写入合并文件失败 ({}): {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 打包错误，对整个批次是致命的
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// 读取已匹配文件失败
    #[error("读取文件失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入压缩条目失败
    #[error("写入压缩条目失败 ({entry}): {source}")]
    EntryFailed {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },
    /// 写入条目内容失败
    #[error("写入条目内容失败 ({entry}): {source}")]
    WriteFailed {
        entry: String,
        #[source]
        source: std::io::Error,
    },
    /// 完成压缩包失败
    #[error("完成压缩包失败: {0}")]
    FinishFailed(#[source] zip::result::ZipError),
}

/// 空结果错误
#[derive(Debug, thiserror::Error)]
pub enum EmptyResultError {
    /// 目录中没有 PDF 文件
    #[error("目录中没有找到PDF文件: {}", dir.display())]
    NoArtifacts { dir: PathBuf },
    /// 没有任何候选人匹配到文件
    #[error("{candidates} 个候选人均未匹配到PDF文件")]
    NothingResolved { candidates: usize },
}

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({}): {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建目录不存在错误
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        AppError::Storage(StorageError::DirectoryNotFound { path: path.into() })
    }

    /// 创建目录读取错误
    pub fn list_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Storage(StorageError::ListFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建"没有 PDF"错误
    pub fn no_artifacts(dir: impl Into<PathBuf>) -> Self {
        AppError::Empty(EmptyResultError::NoArtifacts { dir: dir.into() })
    }

    /// 创建"没有匹配结果"错误
    pub fn nothing_resolved(candidates: usize) -> Self {
        AppError::Empty(EmptyResultError::NothingResolved { candidates })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
