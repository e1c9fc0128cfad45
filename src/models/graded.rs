use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::answer_set::AnswerSet;

/// 及格线（百分制）
pub const PASSING_SCORE: u8 = 60;

/// 标准答案
///
/// 由扫描标准答案卡生成，重新扫描时整体替换
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamKey {
    pub answers: AnswerSet,
    /// 会话内的标准答案版本号，每次设置或清除都会递增
    pub generation: u64,
    pub created_at: DateTime<Local>,
}

impl ExamKey {
    pub fn new(answers: AnswerSet, generation: u64) -> Self {
        Self {
            answers,
            generation,
            created_at: Local::now(),
        }
    }

    /// 题目总数
    pub fn total_questions(&self) -> usize {
        self.answers.len()
    }
}

/// 一张学生答题卡的批改结果，生成后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedResult {
    pub student_id: Option<String>,
    pub student_name: Option<String>,
    /// 与标准答案题号一一对应的学生作答
    pub answers: AnswerSet,
    /// 百分制得分
    pub score: u8,
    pub correct_count: usize,
    pub total_questions: usize,
    /// 错题题号（升序）
    pub wrong_question_numbers: Vec<u32>,
    pub timestamp: DateTime<Local>,
}

impl GradedResult {
    /// 用于列表显示的名字：姓名 > 学号 > 未知
    pub fn display_name(&self) -> &str {
        self.student_name
            .as_deref()
            .or(self.student_id.as_deref())
            .unwrap_or("未知")
    }

    pub fn is_passing(&self) -> bool {
        self.score >= PASSING_SCORE
    }

    pub fn wrong_count(&self) -> usize {
        self.wrong_question_numbers.len()
    }
}
