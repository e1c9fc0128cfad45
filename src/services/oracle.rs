//! 识别服务接口
//!
//! 把一张答题卡图片转换成原始作答列表。具体实现可以是视觉大模型，
//! 也可以是测试中返回固定数据的假实现。

use regex::Regex;
use std::future::Future;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::OracleError;
use crate::models::{ExamData, ScanMode, SheetImage};
use crate::utils::logging::truncate_text;

/// 识别服务
pub trait ExtractionOracle: Send + Sync {
    /// 识别一张答题卡
    ///
    /// `mode` 只影响识别服务内部的提示方式，不影响后续的归一化和判分
    fn analyze(
        &self,
        image: &SheetImage,
        mode: ScanMode,
    ) -> impl Future<Output = Result<ExamData, OracleError>> + Send;
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("代码块正则表达式无效")
    })
}

/// 从模型的文本回复中提取 JSON 对象
///
/// 优先取 Markdown 代码块中的内容，否则取最外层的 `{...}`
pub fn extract_json_object(response: &str) -> Option<&str> {
    let body = fence_regex()
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(response);

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (start < end).then(|| &body[start..=end])
}

/// 解析模型回复
///
/// 标准答案模式下没有任何作答视为失败
pub fn parse_oracle_reply(response: &str, mode: ScanMode) -> Result<ExamData, OracleError> {
    let json = extract_json_object(response).ok_or_else(|| OracleError::NoJsonObject {
        response: truncate_text(response, 200),
    })?;

    let mut data: ExamData = serde_json::from_str(json)?;
    data.raw_text = Some(response.to_string());

    debug!("{}识别结果: {} 条作答", mode, data.answers.len());

    if mode.is_key() && data.answers.is_empty() {
        return Err(OracleError::NoAnswers);
    }

    Ok(data)
}
