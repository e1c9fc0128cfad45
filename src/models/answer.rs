//! 单题作答
//!
//! 识别服务对每道题返回的 `selectedOption` 可能是选项字母、`null`（未作答）
//! 或 `"INVALID"`（多涂）。这里用封闭的枚举把三种情况区分开。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// 多涂标记，识别服务在同一题检测到多个涂黑选项时返回
pub const INVALID_MARK: &str = "INVALID";

/// 标准选项字母表
///
/// 只用于日志提示，超出字母表的选项仍然原样保留
pub const STANDARD_OPTIONS: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

/// 单题的作答状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Selection {
    /// 未作答
    #[default]
    Blank,
    /// 多涂
    Invalid,
    /// 选择了某个选项（原样保留识别结果）
    Marked(String),
}

impl Selection {
    /// 从选项字符串创建
    pub fn marked(option: impl Into<String>) -> Self {
        Self::from(Some(option.into()))
    }

    /// 从识别服务返回的原始 JSON 值解析
    ///
    /// 非字符串、非 null 的值视为数据异常，按未作答处理
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::from(Some(s.clone())),
            _ => Self::Blank,
        }
    }

    /// 判分比较：只有两个相同的选项才算匹配
    ///
    /// `Blank` 和 `Invalid` 与任何值都不匹配，包括它们自身
    pub fn matches(&self, other: &Selection) -> bool {
        match (self, other) {
            (Selection::Marked(a), Selection::Marked(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Selection::Blank)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Selection::Invalid)
    }

    /// 选项字符串（未作答时为 `None`）
    pub fn as_option(&self) -> Option<&str> {
        match self {
            Selection::Blank => None,
            Selection::Invalid => Some(INVALID_MARK),
            Selection::Marked(s) => Some(s.as_str()),
        }
    }

    /// 是否在标准字母表之内
    pub fn is_standard(&self) -> bool {
        match self {
            Selection::Marked(s) => STANDARD_OPTIONS.contains(&s.as_str()),
            _ => true,
        }
    }
}

impl From<Option<String>> for Selection {
    fn from(value: Option<String>) -> Self {
        match value {
            None => Selection::Blank,
            Some(s) if s == INVALID_MARK => Selection::Invalid,
            Some(s) => Selection::Marked(s),
        }
    }
}

impl From<Selection> for Option<String> {
    fn from(value: Selection) -> Self {
        match value {
            Selection::Blank => None,
            Selection::Invalid => Some(INVALID_MARK.to_string()),
            Selection::Marked(s) => Some(s),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_option().unwrap_or("-"))
    }
}

/// 一道题的作答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// 题号（从 1 开始）
    pub question_number: u32,
    #[serde(default)]
    pub selected_option: Selection,
}

impl Answer {
    pub fn new(question_number: u32, selected_option: Selection) -> Self {
        Self {
            question_number,
            selected_option,
        }
    }
}
