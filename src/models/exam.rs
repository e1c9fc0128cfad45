//! 识别服务的输出结构
//!
//! 识别结果可能残缺或带噪声，这里尽量宽松地解析：
//! 单条记录格式错误只丢弃该条，不影响整张答题卡。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// 扫描模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanMode {
    /// 扫描标准答案
    Key,
    /// 扫描学生答题卡
    Student,
}

impl ScanMode {
    pub fn is_key(self) -> bool {
        matches!(self, ScanMode::Key)
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanMode::Key => write!(f, "标准答案"),
            ScanMode::Student => write!(f, "学生答题卡"),
        }
    }
}

/// 识别服务返回的单条原始作答
///
/// 字段保持原始 JSON 值，由归一化步骤决定如何解释
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnswer {
    #[serde(default)]
    pub question_number: Value,
    #[serde(default)]
    pub selected_option: Value,
}

impl RawAnswer {
    /// 创建一条格式正确的原始作答
    pub fn new(question_number: u32, selected_option: Option<&str>) -> Self {
        Self {
            question_number: Value::from(question_number),
            selected_option: selected_option.map(Value::from).unwrap_or(Value::Null),
        }
    }

    /// 直接使用任意 JSON 值创建
    pub fn from_values(question_number: Value, selected_option: Value) -> Self {
        Self {
            question_number,
            selected_option,
        }
    }
}

/// 一次识别的完整输出
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamData {
    #[serde(default, deserialize_with = "deserialize_identity")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_identity")]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_answers")]
    pub answers: Vec<RawAnswer>,
    /// 模型原始回复，仅用于排查
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl ExamData {
    pub fn new(answers: Vec<RawAnswer>) -> Self {
        Self {
            answers,
            ..Default::default()
        }
    }

    pub fn with_identity(
        mut self,
        student_id: Option<&str>,
        student_name: Option<&str>,
    ) -> Self {
        self.student_id = student_id.map(str::to_string);
        self.student_name = student_name.map(str::to_string);
        self
    }
}

// 学号可能被识别成数字，姓名可能是空串
fn deserialize_identity<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// answers 不是数组时视为空；非对象记录直接丢弃
fn deserialize_answers<'de, D>(deserializer: D) -> Result<Vec<RawAnswer>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(other) => {
            debug!("answers 字段不是数组，按空处理: {}", other);
            return Ok(Vec::new());
        }
        None => return Ok(Vec::new()),
    };

    let mut answers = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_object() {
            debug!("丢弃格式错误的作答记录: {}", item);
            continue;
        }
        match serde_json::from_value::<RawAnswer>(item) {
            Ok(answer) => answers.push(answer),
            Err(e) => debug!("丢弃无法解析的作答记录: {}", e),
        }
    }
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_well_formed() {
        let data: ExamData = serde_json::from_value(json!({
            "studentId": "20240101",
            "studentName": "张三",
            "answers": [
                { "questionNumber": 1, "selectedOption": "A" },
                { "questionNumber": 2, "selectedOption": null }
            ]
        }))
        .unwrap();

        assert_eq!(data.student_id.as_deref(), Some("20240101"));
        assert_eq!(data.student_name.as_deref(), Some("张三"));
        assert_eq!(data.answers.len(), 2);
        assert_eq!(data.answers[0], RawAnswer::new(1, Some("A")));
        assert_eq!(data.answers[1], RawAnswer::new(2, None));
    }

    #[test]
    fn test_malformed_records_are_dropped() {
        let data: ExamData = serde_json::from_value(json!({
            "answers": [
                42,
                "garbage",
                { "questionNumber": 3, "selectedOption": "C" }
            ]
        }))
        .unwrap();

        assert_eq!(data.answers, vec![RawAnswer::new(3, Some("C"))]);
    }

    #[test]
    fn test_numeric_student_id_and_missing_fields() {
        let data: ExamData =
            serde_json::from_value(json!({ "studentId": 1234, "studentName": "" })).unwrap();

        assert_eq!(data.student_id.as_deref(), Some("1234"));
        assert_eq!(data.student_name, None);
        assert!(data.answers.is_empty());
    }

    #[test]
    fn test_non_array_answers() {
        let data: ExamData = serde_json::from_value(json!({ "answers": "none" })).unwrap();
        assert!(data.answers.is_empty());
    }
}
