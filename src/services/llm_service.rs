//! 视觉模型识别服务 - 业务能力层
//!
//! 只负责"看图读答题卡"能力，不关心判分和流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::OracleError;
use crate::models::{ExamData, ScanMode, SheetImage};
use crate::services::oracle::{parse_oracle_reply, ExtractionOracle};
use crate::utils::logging::truncate_text;

const SYSTEM_INSTRUCTION: &str = r#"你是一个答题卡光学识别（OMR）引擎，负责从答题卡照片中读取填涂结果，并且只输出 JSON。

答题卡样式：
- 题目通常分多栏排列（例如左栏 1-25，右栏 26-50）
- 题号是黑色方块中的白色数字
- 选项用方括号括起，如 [A] [B] [C] [D]，最多到 [G]
- 被选中的选项是完全涂黑、看不清字母的方块
- 未选中的选项能清楚看到括号里的字母

识别规则：
1. 如果页面顶部有学号、姓名，请一并提取
2. 找到每一个题号，判断该题哪个选项被涂黑
   - 只有一个选项被涂黑时，返回该选项字母，例如 "A"
   - 没有选项被涂黑时，返回 null
   - 多个选项被涂黑时，返回 "INVALID"
3. 扫描所有栏目，不要遗漏任何题目

输出格式（严格遵守，不要输出其他内容）：
{"studentId": "学号或null", "studentName": "姓名或null", "answers": [{"questionNumber": 1, "selectedOption": "A"}]}"#;

const KEY_PROMPT: &str =
    "这是一张标准答案卡。请识别卡上标记的所有正确答案，扫描每一道题。";

const STUDENT_PROMPT: &str =
    "这是一张学生答题卡。请识别学生信息，并提取每个题号所选的选项。";

/// 视觉模型识别服务
///
/// 职责：
/// - 把答题卡图片和提示词发给视觉模型
/// - 把模型回复解析为 `ExamData`
/// - 不做归一化，不判分
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的识别服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 根据扫描模式选择用户提示词
    fn prompt_for(mode: ScanMode) -> &'static str {
        match mode {
            ScanMode::Key => KEY_PROMPT,
            ScanMode::Student => STUDENT_PROMPT,
        }
    }

    /// 发送图片和提示词，返回模型的文本回复
    async fn send_image(&self, image: &SheetImage, mode: ScanMode) -> Result<String, OracleError> {
        debug!(
            "调用视觉模型，模型: {}，图片: {} ({} 字节)",
            self.model_name,
            image.file_name,
            image.bytes.len()
        );

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_INSTRUCTION)
            .build()?;

        let content_parts = vec![
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: image.to_data_url(),
                        detail: Some(ImageDetail::High),
                    },
                },
            ),
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: Self::prompt_for(mode).to_string(),
                },
            ),
        ];

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()?;

        let messages = vec![
            ChatCompletionRequestMessage::System(system_msg),
            ChatCompletionRequestMessage::User(user_msg),
        ];

        // 温度设为 0，尽量保证识别结果稳定
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.0)
            .max_tokens(4096u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("视觉模型调用失败: {}", e);
            OracleError::api_call_failed(&self.model_name, e)
        })?;

        debug!("视觉模型调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| OracleError::EmptyResponse {
                model: self.model_name.clone(),
            })?;

        debug!("模型回复: {}", truncate_text(&content, 300));

        Ok(content.trim().to_string())
    }
}

impl ExtractionOracle for LlmService {
    async fn analyze(&self, image: &SheetImage, mode: ScanMode) -> Result<ExamData, OracleError> {
        let response = self.send_image(image, mode).await?;
        parse_oracle_reply(&response, mode)
    }
}
