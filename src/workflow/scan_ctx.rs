//! 扫描上下文
//!
//! 封装"我正在处理第几张答题卡、哪个文件"这一信息

use std::fmt::Display;

use crate::models::ScanMode;

/// 扫描上下文
///
/// 只用于日志显示，不参与判分
#[derive(Debug, Clone)]
pub struct ScanCtx {
    /// 扫描模式
    pub mode: ScanMode,

    /// 答题卡序号（从1开始，标准答案为 0）
    pub sheet_index: usize,

    /// 图片文件名
    pub file_name: String,
}

impl ScanCtx {
    /// 标准答案扫描上下文
    pub fn key(file_name: impl Into<String>) -> Self {
        Self {
            mode: ScanMode::Key,
            sheet_index: 0,
            file_name: file_name.into(),
        }
    }

    /// 学生答题卡扫描上下文
    pub fn student(sheet_index: usize, file_name: impl Into<String>) -> Self {
        Self {
            mode: ScanMode::Student,
            sheet_index,
            file_name: file_name.into(),
        }
    }
}

impl Display for ScanCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mode {
            ScanMode::Key => write!(f, "[标准答案 {}]", self.file_name),
            ScanMode::Student => write!(f, "[答题卡 #{} {}]", self.sheet_index, self.file_name),
        }
    }
}
