//! 答题明细的文本渲染
//!
//! 每行 5 道题。对照标准答案时，答错的题在后面附上正确选项。

use crate::models::{AnswerSet, ExamKey, GradedResult};

const COLUMNS: usize = 5;

/// 渲染批改结果，错题附上标准答案
pub fn render(result: &GradedResult, key: &ExamKey) -> String {
    let cells: Vec<String> = result
        .answers
        .iter()
        .map(|(q, selection)| {
            let expected = key.answers.get(q);
            match expected {
                Some(expected) if expected.matches(selection) => {
                    format!("{:>3}: {} ✓", q, selection)
                }
                Some(expected) => format!("{:>3}: {} ✗({})", q, selection, expected),
                None => format!("{:>3}: {}", q, selection),
            }
        })
        .collect();
    layout(&cells)
}

/// 只渲染一组作答（例如标准答案本身）
pub fn render_answers(answers: &AnswerSet) -> String {
    let cells: Vec<String> = answers
        .iter()
        .map(|(q, selection)| format!("{:>3}: {}", q, selection))
        .collect();
    layout(&cells)
}

fn layout(cells: &[String]) -> String {
    cells
        .chunks(COLUMNS)
        .map(|row| row.join("  "))
        .collect::<Vec<_>>()
        .join("\n")
}
