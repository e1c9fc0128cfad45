use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::debug;

use crate::models::answer::{Answer, Selection};

/// 题号 → 作答 的映射
///
/// 题号从 1 开始且唯一，按题号升序迭代。重复题号以第一次出现的为准。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Answer>", into = "Vec<Answer>")]
pub struct AnswerSet {
    answers: BTreeMap<u32, Selection>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一道题，题号为 0 或已存在时丢弃新值
    ///
    /// # 返回
    /// 返回是否插入成功
    pub fn insert_first(&mut self, question_number: u32, selection: Selection) -> bool {
        if question_number == 0 {
            debug!("丢弃题号为 0 的作答");
            return false;
        }

        match self.answers.entry(question_number) {
            Entry::Vacant(slot) => {
                slot.insert(selection);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, question_number: u32) -> Option<&Selection> {
        self.answers.get(&question_number)
    }

    pub fn contains(&self, question_number: u32) -> bool {
        self.answers.contains_key(&question_number)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// 按题号升序迭代
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Selection)> + '_ {
        self.answers.iter().map(|(q, s)| (*q, s))
    }

    /// 升序题号列表
    pub fn question_numbers(&self) -> Vec<u32> {
        self.answers.keys().copied().collect()
    }

    /// 转换为有序的作答列表
    pub fn to_answers(&self) -> Vec<Answer> {
        self.iter()
            .map(|(q, s)| Answer::new(q, s.clone()))
            .collect()
    }
}

impl From<Vec<Answer>> for AnswerSet {
    fn from(answers: Vec<Answer>) -> Self {
        answers.into_iter().collect()
    }
}

impl From<AnswerSet> for Vec<Answer> {
    fn from(set: AnswerSet) -> Self {
        set.answers
            .into_iter()
            .map(|(q, s)| Answer::new(q, s))
            .collect()
    }
}

impl FromIterator<Answer> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = Answer>>(iter: T) -> Self {
        let mut set = AnswerSet::new();
        for answer in iter {
            set.insert_first(answer.question_number, answer.selected_option);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_insert_wins() {
        let mut set = AnswerSet::new();
        assert!(set.insert_first(1, Selection::marked("A")));
        assert!(!set.insert_first(1, Selection::marked("B")));
        assert_eq!(set.get(1), Some(&Selection::marked("A")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_question_zero_is_rejected() {
        let mut set = AnswerSet::new();
        assert!(!set.insert_first(0, Selection::marked("A")));
        assert!(set.is_empty());

        let parsed: AnswerSet = serde_json::from_value(serde_json::json!([
            { "questionNumber": 0, "selectedOption": "A" },
            { "questionNumber": 1, "selectedOption": "B" }
        ]))
        .unwrap();
        assert_eq!(parsed.question_numbers(), vec![1]);
    }

    #[test]
    fn test_iterates_in_ascending_order() {
        let set: AnswerSet = vec![
            Answer::new(10, Selection::marked("C")),
            Answer::new(2, Selection::marked("A")),
            Answer::new(7, Selection::Blank),
        ]
        .into();

        assert_eq!(set.question_numbers(), vec![2, 7, 10]);
    }

    #[test]
    fn test_serializes_as_answer_list() {
        let set: AnswerSet = vec![
            Answer::new(2, Selection::Blank),
            Answer::new(1, Selection::marked("D")),
        ]
        .into();

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r#"[{"questionNumber":1,"selectedOption":"D"},{"questionNumber":2,"selectedOption":null}]"#
        );
    }
}
