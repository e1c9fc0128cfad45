//! 报告写入服务 - 业务能力层
//!
//! 只负责"把批改结果追加到报告文件"能力，不关心流程

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{AppResult, FileError};
use crate::models::GradedResult;

/// 报告写入服务
///
/// 职责：
/// - 每张答题卡追加一行批改摘要
/// - 不关心结果从哪里来
pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    /// 使用指定的报告文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.report_file_path
    }

    /// 写入一条批改结果
    ///
    /// # 参数
    /// - `sheet_name`: 答题卡文件名
    /// - `result`: 批改结果
    pub async fn write(&self, sheet_name: &str, result: &GradedResult) -> AppResult<()> {
        debug!("写入报告: {} | {}", sheet_name, result.display_name());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)
            .await
            .map_err(|e| FileError::write_failed(&self.report_file_path, e))?;

        file.write_all(format_report_line(sheet_name, result).as_bytes())
            .await
            .map_err(|e| FileError::write_failed(&self.report_file_path, e))?;
        file.flush()
            .await
            .map_err(|e| FileError::write_failed(&self.report_file_path, e))?;

        Ok(())
    }
}

/// 格式化一行报告
pub fn format_report_line(sheet_name: &str, result: &GradedResult) -> String {
    let wrong = if result.wrong_question_numbers.is_empty() {
        "无".to_string()
    } else {
        result
            .wrong_question_numbers
            .iter()
            .map(|q| q.to_string())
            .collect::<Vec<_>>()
            .join(",")
    };

    format!(
        "{} | {} | 学生: {} | 得分: {} | 正确: {}/{} | 错题: {}\n",
        result.timestamp.format("%Y-%m-%d %H:%M:%S"),
        sheet_name,
        result.display_name(),
        result.score,
        result.correct_count,
        result.total_questions,
        wrong
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerSet;
    use chrono::{Local, TimeZone};

    fn sample_result(wrong: Vec<u32>) -> GradedResult {
        GradedResult {
            student_id: Some("S01".to_string()),
            student_name: None,
            answers: AnswerSet::new(),
            score: 33,
            correct_count: 1,
            total_questions: 3,
            wrong_question_numbers: wrong,
            timestamp: Local.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_format_report_line() {
        let line = format_report_line("sheet_01.jpg", &sample_result(vec![2, 3]));
        assert_eq!(
            line,
            "2026-03-01 09:30:00 | sheet_01.jpg | 学生: S01 | 得分: 33 | 正确: 1/3 | 错题: 2,3\n"
        );
    }

    #[test]
    fn test_report_path_comes_from_config() {
        let config = crate::config::Config::default();
        let writer = ReportWriter::with_path(&config.output_log_file);
        assert_eq!(writer.path(), config.output_log_file);
    }

    #[tokio::test]
    async fn test_write_appends() {
        let path = std::env::temp_dir().join(format!("omr_report_{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let writer = ReportWriter::with_path(path.to_string_lossy().to_string());

        writer.write("a.jpg", &sample_result(vec![2, 3])).await.unwrap();
        writer.write("b.jpg", &sample_result(vec![])).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("a.jpg"));
        assert!(lines[1].ends_with("错题: 无"));
    }
}
