use crate::error::{AppResult, ConfigError};

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- 视觉模型配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 标准答案卡图片路径
    pub key_image_path: String,
    /// 标准答案保存文件（TOML），存在时直接加载，跳过扫描
    pub key_file: Option<String>,
    /// 学生答题卡图片存放目录
    pub sheets_folder: String,
    /// 批改报告文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o".to_string(),
            key_image_path: "answer_key.jpg".to_string(),
            key_file: None,
            sheets_folder: "sheets".to_string(),
            output_log_file: "grading_report.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            key_image_path: std::env::var("KEY_IMAGE_PATH").unwrap_or(default.key_image_path),
            key_file: std::env::var("KEY_FILE").ok().filter(|v| !v.is_empty()).or(default.key_file),
            sheets_folder: std::env::var("SHEETS_FOLDER").unwrap_or(default.sheets_folder),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 检查必填项
    pub fn validate(&self) -> AppResult<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::EnvVarNotFound {
                var_name: "LLM_API_KEY".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
