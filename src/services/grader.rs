//! 判分引擎 - 业务能力层
//!
//! 以标准答案的题号集合驱动判分：
//! - 标准答案中的每道题按题号升序逐一比较
//! - 学生缺答的题按未作答处理并计为错题
//! - 学生作答了但标准答案中没有的题号不进入结果
//!
//! 判分是同步的纯函数，只依赖传入的标准答案快照。

use chrono::{DateTime, Local};
use tracing::debug;

use crate::models::{AnswerSet, ExamData, ExamKey, GradedResult, Selection};
use crate::services::normalizer;

/// 对原始识别结果判分
pub fn grade(key: &ExamKey, student: &ExamData) -> GradedResult {
    let answers = normalizer::normalize(&student.answers);
    grade_normalized(key, student, &answers, Local::now())
}

/// 对已归一化的学生作答判分
pub fn grade_normalized(
    key: &ExamKey,
    student: &ExamData,
    student_answers: &AnswerSet,
    timestamp: DateTime<Local>,
) -> GradedResult {
    let mut correct_count = 0;
    let mut wrong_question_numbers = Vec::new();
    let mut answers = AnswerSet::new();

    for (question_number, expected) in key.answers.iter() {
        let actual = student_answers
            .get(question_number)
            .cloned()
            .unwrap_or(Selection::Blank);

        if expected.matches(&actual) {
            correct_count += 1;
        } else {
            wrong_question_numbers.push(question_number);
        }

        answers.insert_first(question_number, actual);
    }

    let total_questions = key.total_questions();
    let score = score_percent(correct_count, total_questions);

    debug!(
        "判分完成: {}/{} 正确, 得分 {}",
        correct_count, total_questions, score
    );

    GradedResult {
        student_id: student.student_id.clone(),
        student_name: student.student_name.clone(),
        answers,
        score,
        correct_count,
        total_questions,
        wrong_question_numbers,
        timestamp,
    }
}

/// 百分制得分，四舍五入（0.5 进位）；总题数为 0 时得 0 分
pub fn score_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total) as u64;
    let total = total as u64;
    ((200 * correct + total) / (2 * total)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answer, RawAnswer};

    fn key_of(pairs: &[(u32, Option<&str>)]) -> ExamKey {
        let answers: AnswerSet = pairs
            .iter()
            .map(|(q, s)| Answer::new(*q, Selection::from(s.map(str::to_string))))
            .collect();
        ExamKey::new(answers, 1)
    }

    fn student_of(pairs: &[(u32, Option<&str>)]) -> ExamData {
        ExamData::new(pairs.iter().map(|(q, s)| RawAnswer::new(*q, *s)).collect())
    }

    #[test]
    fn test_end_to_end_example() {
        let key = key_of(&[(1, Some("A")), (2, Some("B")), (3, Some("C"))]);
        let student = student_of(&[(1, Some("A")), (2, Some("C"))]);

        let result = grade(&key, &student);

        assert_eq!(result.correct_count, 1);
        assert_eq!(result.wrong_question_numbers, vec![2, 3]);
        assert_eq!(result.score, 33);
        assert_eq!(result.total_questions, 3);
        assert_eq!(result.answers.get(1), Some(&Selection::marked("A")));
        assert_eq!(result.answers.get(2), Some(&Selection::marked("C")));
        assert_eq!(result.answers.get(3), Some(&Selection::Blank));
    }

    #[test]
    fn test_extra_student_questions_are_dropped() {
        let key = key_of(&[(1, Some("A")), (2, Some("B"))]);
        let student = student_of(&[(1, Some("A")), (2, Some("B")), (99, Some("D"))]);

        let result = grade(&key, &student);

        assert_eq!(result.answers.question_numbers(), vec![1, 2]);
        assert!(!result.answers.contains(99));
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_invalid_never_scores() {
        let key = key_of(&[(1, Some("A")), (2, Some("INVALID"))]);
        let student = student_of(&[(1, Some("INVALID")), (2, Some("INVALID"))]);

        let result = grade(&key, &student);

        assert_eq!(result.correct_count, 0);
        assert_eq!(result.wrong_question_numbers, vec![1, 2]);
    }

    #[test]
    fn test_blank_key_entry_never_scores() {
        let key = key_of(&[(1, None)]);
        let student = student_of(&[(1, None)]);

        let result = grade(&key, &student);

        assert_eq!(result.correct_count, 0);
        assert_eq!(result.wrong_question_numbers, vec![1]);
    }

    #[test]
    fn test_whitespace_options_compare_verbatim() {
        let key = ExamKey::new(
            crate::services::normalizer::normalize(&[RawAnswer::new(1, Some(" ")), RawAnswer::new(2, Some(""))]),
            1,
        );
        let student = student_of(&[(1, Some(" ")), (2, Some(" "))]);

        let result = grade(&key, &student);

        assert_eq!(key.answers.get(1), Some(&Selection::marked(" ")));
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.wrong_question_numbers, vec![2]);
    }

    #[test]
    fn test_empty_key() {
        let key = key_of(&[]);
        let student = student_of(&[(1, Some("A")), (2, Some("B"))]);

        let result = grade(&key, &student);

        assert_eq!(result.correct_count, 0);
        assert!(result.wrong_question_numbers.is_empty());
        assert_eq!(result.score, 0);
        assert_eq!(result.total_questions, 0);
        assert!(result.answers.is_empty());
    }

    #[test]
    fn test_counts_always_add_up() {
        let key = key_of(&[
            (1, Some("A")),
            (2, Some("B")),
            (3, Some("C")),
            (5, Some("D")),
            (8, None),
        ]);
        let students = [
            student_of(&[]),
            student_of(&[(1, Some("A")), (2, Some("B")), (3, Some("C")), (5, Some("D"))]),
            student_of(&[(5, Some("D")), (5, Some("A")), (7, Some("B")), (1, Some("INVALID"))]),
            student_of(&[(2, Some("b")), (3, Some("C")), (100, None)]),
        ];

        for student in &students {
            let result = grade(&key, student);
            assert_eq!(
                result.correct_count + result.wrong_question_numbers.len(),
                result.total_questions
            );
            assert_eq!(result.answers.len(), key.total_questions());
            assert_eq!(
                result.score,
                score_percent(result.correct_count, result.total_questions)
            );
        }
    }

    #[test]
    fn test_identity_is_carried_over() {
        let key = key_of(&[(1, Some("A"))]);
        let student = student_of(&[(1, Some("A"))]).with_identity(Some("S01"), Some("王五"));

        let result = grade(&key, &student);

        assert_eq!(result.student_id.as_deref(), Some("S01"));
        assert_eq!(result.student_name.as_deref(), Some("王五"));
    }

    #[test]
    fn test_score_rounding() {
        assert_eq!(score_percent(0, 0), 0);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(1, 8), 13);
        assert_eq!(score_percent(3, 8), 38);
        assert_eq!(score_percent(49, 50), 98);
        assert_eq!(score_percent(50, 50), 100);
    }
}
