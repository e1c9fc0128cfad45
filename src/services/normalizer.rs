//! 作答归一化 - 业务能力层
//!
//! 把识别服务返回的原始作答列表整理成 `AnswerSet`：
//! - 题号无法转换为正整数的记录直接丢弃
//! - 重复题号以第一次出现的为准
//! - 选项字符串原样保留，不做字母表校验
//!
//! 归一化从不报错。结果为空时由调用方决定是否视为失败。

use serde_json::Value;
use tracing::debug;

use crate::models::{AnswerSet, RawAnswer, Selection};

/// 归一化统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    /// 接受的记录数
    pub accepted: usize,
    /// 题号非法而丢弃的记录数
    pub invalid_numbers: usize,
    /// 重复题号而丢弃的记录数
    pub duplicates: usize,
    /// 字母表之外的选项数（仍然保留）
    pub nonstandard_options: usize,
}

/// 归一化原始作答
pub fn normalize(raw: &[RawAnswer]) -> AnswerSet {
    normalize_with_stats(raw).0
}

/// 归一化原始作答，同时返回统计信息
pub fn normalize_with_stats(raw: &[RawAnswer]) -> (AnswerSet, NormalizeStats) {
    let mut set = AnswerSet::new();
    let mut stats = NormalizeStats::default();

    for record in raw {
        let Some(question_number) = coerce_question_number(&record.question_number) else {
            debug!("丢弃题号非法的记录: {}", record.question_number);
            stats.invalid_numbers += 1;
            continue;
        };

        let selection = Selection::from_value(&record.selected_option);
        if !selection.is_standard() {
            debug!("题 {} 的选项不在标准字母表内: {}", question_number, selection);
            stats.nonstandard_options += 1;
        }

        if set.insert_first(question_number, selection) {
            stats.accepted += 1;
        } else {
            debug!("丢弃重复题号 {}", question_number);
            stats.duplicates += 1;
        }
    }

    (set, stats)
}

/// 把题号转换为正整数
///
/// 接受整数、小数部分为 0 的浮点数，以及内容为整数的字符串
pub fn coerce_question_number(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u
            } else {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f < 1.0 || f > u32::MAX as f64 {
                    return None;
                }
                f as u64
            }
        }
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };

    if number == 0 {
        return None;
    }
    u32::try_from(number).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_occurrence_wins() {
        let raw = vec![RawAnswer::new(1, Some("A")), RawAnswer::new(1, Some("B"))];
        let (set, stats) = normalize_with_stats(&raw);

        assert_eq!(set.get(1), Some(&Selection::marked("A")));
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn test_unordered_input_is_sorted() {
        let raw = vec![
            RawAnswer::new(3, Some("C")),
            RawAnswer::new(1, Some("A")),
            RawAnswer::new(2, None),
        ];
        let set = normalize(&raw);

        assert_eq!(set.question_numbers(), vec![1, 2, 3]);
        assert_eq!(set.get(2), Some(&Selection::Blank));
    }

    #[test]
    fn test_bad_question_numbers_are_dropped() {
        let raw = vec![
            RawAnswer::from_values(json!(0), json!("A")),
            RawAnswer::from_values(json!(-2), json!("A")),
            RawAnswer::from_values(json!(2.5), json!("A")),
            RawAnswer::from_values(json!("abc"), json!("A")),
            RawAnswer::from_values(json!(null), json!("A")),
            RawAnswer::from_values(json!(true), json!("A")),
            RawAnswer::from_values(json!(5_000_000_000u64), json!("A")),
            RawAnswer::from_values(json!(4), json!("D")),
        ];
        let (set, stats) = normalize_with_stats(&raw);

        assert_eq!(set.question_numbers(), vec![4]);
        assert_eq!(stats.invalid_numbers, 7);
    }

    #[test]
    fn test_coercible_question_numbers() {
        assert_eq!(coerce_question_number(&json!(7)), Some(7));
        assert_eq!(coerce_question_number(&json!(7.0)), Some(7));
        assert_eq!(coerce_question_number(&json!(" 12 ")), Some(12));
        assert_eq!(coerce_question_number(&json!("0")), None);
    }

    #[test]
    fn test_options_kept_verbatim() {
        let raw = vec![
            RawAnswer::new(1, Some("X")),
            RawAnswer::new(2, Some("INVALID")),
            RawAnswer::from_values(json!(3), json!(9)),
        ];
        let (set, stats) = normalize_with_stats(&raw);

        assert_eq!(set.get(1), Some(&Selection::marked("X")));
        assert_eq!(set.get(2), Some(&Selection::Invalid));
        assert_eq!(set.get(3), Some(&Selection::Blank));
        assert_eq!(stats.nonstandard_options, 1);
    }

    #[test]
    fn test_empty_input() {
        let set = normalize(&[]);
        assert!(set.is_empty());
    }
}
