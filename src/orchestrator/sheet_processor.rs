//! 单张答题卡处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理一张学生答题卡，是答题卡级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **流程调度**：调用 `ScanFlow` 完成识别和判分
//! 2. **报告写入**：批改成功后追加一行报告
//! 3. **错误隔离**：单张答题卡失败只记录日志，不影响后续答题卡

use anyhow::Result;
use tracing::error;

use crate::models::SheetImage;
use crate::services::{ExtractionOracle, ReportWriter};
use crate::workflow::{ScanCtx, ScanFlow};

/// 处理单张答题卡
///
/// # 参数
/// - `flow`: 扫描流程
/// - `report_writer`: 报告写入服务
/// - `sheet`: 答题卡图片
/// - `sheet_index`: 答题卡序号（用于日志）
///
/// # 返回
/// 返回是否批改成功；只有写报告失败才返回错误
pub async fn process_sheet<O: ExtractionOracle>(
    flow: &ScanFlow<O>,
    report_writer: &ReportWriter,
    sheet: &SheetImage,
    sheet_index: usize,
) -> Result<bool> {
    let ctx = ScanCtx::student(sheet_index, &sheet.file_name);

    match flow.scan_student(sheet, &ctx).await {
        Ok(result) => {
            report_writer.write(&sheet.file_name, &result).await?;
            Ok(true)
        }
        Err(e) => {
            error!("{} ❌ 批改失败: {}", ctx, e);
            Ok(false)
        }
    }
}
