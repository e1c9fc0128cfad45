use async_openai::error::OpenAIError;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 识别服务错误
    #[error("识别服务错误: {0}")]
    Oracle(#[from] OracleError),
    /// 会话状态错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 扫描流程错误
    #[error("流程错误: {0}")]
    Workflow(#[from] WorkflowError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 识别服务错误
///
/// 对当前操作是终止性的，可由用户重新拍照重试，不修改任何状态
#[derive(Debug, Error)]
pub enum OracleError {
    /// API 调用失败
    #[error("视觉模型调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: OpenAIError,
    },
    /// 构建请求失败
    #[error("构建请求失败: {0}")]
    BuildRequest(#[from] OpenAIError),
    /// 返回内容为空
    #[error("视觉模型返回内容为空 (模型: {model})")]
    EmptyResponse { model: String },
    /// 返回内容中找不到 JSON 对象
    #[error("视觉模型返回内容中没有 JSON 对象: {response}")]
    NoJsonObject { response: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    JsonParseFailed(#[from] serde_json::Error),
    /// 没有识别到任何作答
    #[error("未识别到任何作答，请拍摄更清晰的图片后重试")]
    NoAnswers,
}

/// 会话状态错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// 尚未设置标准答案
    #[error("尚未设置标准答案，无法批改")]
    NoActiveKey,
    /// 扫描期间标准答案已被替换或清除
    #[error("标准答案已变更 (扫描时版本: {expected}, 当前版本: {current})，结果已丢弃")]
    StaleKey { expected: u64, current: u64 },
    /// 历史记录索引越界
    #[error("历史记录索引 {index} 超出范围 (共 {len} 条)")]
    HistoryIndexOutOfRange { index: usize, len: usize },
}

/// 扫描流程错误
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// 已有扫描正在进行
    #[error("已有答题卡正在处理，请稍候")]
    Busy,
    /// 扫描被取消
    #[error("扫描已取消")]
    Cancelled,
    /// 归一化后没有有效作答
    #[error("未检测到有效作答，请拍摄更清晰的图片后重试")]
    NoAnswersDetected,
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 不支持的图片格式
    #[error("不支持的图片格式: {path}")]
    UnsupportedImage { path: String },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// TOML 序列化失败
    #[error("TOML序列化失败: {0}")]
    TomlSerializeFailed(#[from] toml::ser::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
}

// ========== 便捷构造函数 ==========

impl FileError {
    /// 创建文件读取错误
    pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.into(),
            source,
        }
    }

    /// 创建文件写入错误
    pub fn write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.into(),
            source,
        }
    }
}

impl OracleError {
    /// 创建视觉模型调用错误
    pub fn api_call_failed(model: impl Into<String>, source: OpenAIError) -> Self {
        OracleError::ApiCallFailed {
            model: model.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
