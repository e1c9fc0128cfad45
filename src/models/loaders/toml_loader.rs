//! 标准答案的 TOML 持久化
//!
//! 会话结束后标准答案不会自动保留，需要跨进程复用时可以保存到 TOML 文件。

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::error::{AppResult, FileError};
use crate::models::answer::{Answer, Selection};
use crate::models::answer_set::AnswerSet;

#[derive(Debug, Serialize, Deserialize)]
struct KeyFile {
    #[serde(default)]
    answers: Vec<KeyEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct KeyEntry {
    question_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_option: Option<String>,
}

/// 从 TOML 文件加载标准答案
pub async fn load_key_from_toml(path: &Path) -> AppResult<AnswerSet> {
    let path_str = path.display().to_string();
    if !path.exists() {
        return Err(FileError::NotFound { path: path_str }.into());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| FileError::read_failed(&path_str, e))?;

    let file: KeyFile = toml::from_str(&content).map_err(|e| FileError::TomlParseFailed {
        path: path_str.clone(),
        source: e,
    })?;

    // 题号为 0 的条目在插入时被丢弃
    let answers: AnswerSet = file
        .answers
        .into_iter()
        .map(|entry| Answer::new(entry.question_number, Selection::from(entry.selected_option)))
        .collect();

    tracing::info!("成功加载标准答案: {} 道题 ({})", answers.len(), path_str);

    Ok(answers)
}

/// 保存标准答案到 TOML 文件
pub async fn save_key_to_toml(path: &Path, answers: &AnswerSet) -> AppResult<()> {
    let file = KeyFile {
        answers: answers
            .iter()
            .map(|(q, s)| KeyEntry {
                question_number: q,
                selected_option: s.as_option().map(str::to_string),
            })
            .collect(),
    };

    let content = toml::to_string(&file).map_err(FileError::from)?;
    fs::write(path, content)
        .await
        .map_err(|e| FileError::write_failed(path.display().to_string(), e))?;

    tracing::info!("标准答案已保存至: {}", path.display());

    Ok(())
}
