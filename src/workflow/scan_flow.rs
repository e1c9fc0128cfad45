//! 答题卡扫描流程 - 流程层
//!
//! 核心职责：定义"一次拍照识别"的完整处理流程
//!
//! 流程顺序：
//! 1. 标准答案：加锁 → 识别 → 归一化 → 设置标准答案
//! 2. 学生答题卡：检查标准答案 → 取快照 → 加锁 → 识别 → 归一化 → 判分 → 记录历史
//!
//! 任何一步失败都不会修改会话状态，锁在所有退出路径上自动释放。

use chrono::Local;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::error::{OracleError, WorkflowError};
use crate::models::{ExamData, ExamKey, GradedResult, ScanMode, SheetImage};
use crate::services::normalizer::{self, NormalizeStats};
use crate::services::{answer_grid, grader, ExtractionOracle, SessionStore};
use crate::workflow::latch::{ProcessingLatch, ProcessingPermit, ProcessingState};
use crate::workflow::scan_ctx::ScanCtx;

/// 答题卡扫描流程
///
/// - 编排识别、归一化、判分、记录
/// - 同一时间只允许一次识别在进行
/// - 不持有标准答案，只在需要时从会话存储取快照
pub struct ScanFlow<O: ExtractionOracle> {
    oracle: O,
    store: Arc<SessionStore>,
    latch: ProcessingLatch,
    cancel: Notify,
    verbose_logging: bool,
}

impl<O: ExtractionOracle> ScanFlow<O> {
    /// 创建新的扫描流程
    pub fn new(oracle: O, store: Arc<SessionStore>) -> Self {
        Self {
            oracle,
            store,
            latch: ProcessingLatch::new(),
            cancel: Notify::new(),
            verbose_logging: false,
        }
    }

    /// 是否输出答题明细
    pub fn with_verbose_logging(mut self, verbose_logging: bool) -> Self {
        self.verbose_logging = verbose_logging;
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// 当前处理状态
    pub fn processing_state(&self) -> ProcessingState {
        self.latch.state()
    }

    /// 取消正在进行的识别
    ///
    /// 被取消的扫描返回 `WorkflowError::Cancelled`，不提交任何结果。
    /// 没有扫描在进行时调用无效果。
    pub fn cancel(&self) {
        if self.latch.request_cancel() {
            self.cancel.notify_waiters();
        }
    }

    /// 扫描标准答案
    pub async fn scan_key(
        &self,
        image: &SheetImage,
        ctx: &ScanCtx,
    ) -> Result<Arc<ExamKey>, WorkflowError> {
        let permit = self.latch.try_begin("正在分析标准答案...")?;

        info!("{} 🔍 正在识别标准答案...", ctx);
        let data = self.analyze(&permit, image, ScanMode::Key).await?;

        if data.answers.is_empty() {
            warn!("{} ⚠️ 识别结果中没有任何作答", ctx);
            return Err(OracleError::NoAnswers.into());
        }

        let (answers, stats) = normalizer::normalize_with_stats(&data.answers);
        self.log_normalize_stats(ctx, &stats);

        if answers.is_empty() {
            warn!("{} ⚠️ 归一化后没有有效作答", ctx);
            return Err(WorkflowError::NoAnswersDetected);
        }

        if self.verbose_logging {
            info!("{} 标准答案:\n{}", ctx, answer_grid::render_answers(&answers));
        }

        ensure_not_cancelled(&permit, ctx)?;
        let key = self.store.set_key(answers);
        info!("{} ✓ 标准答案识别完成，共 {} 道题", ctx, key.total_questions());

        Ok(key)
    }

    /// 扫描并批改学生答题卡
    ///
    /// 判分使用扫描开始时的标准答案快照；如果扫描期间标准答案被替换或清除，
    /// 结果会被丢弃并返回 `SessionError::StaleKey`
    pub async fn scan_student(
        &self,
        image: &SheetImage,
        ctx: &ScanCtx,
    ) -> Result<Arc<GradedResult>, WorkflowError> {
        let key = self.store.require_key()?;
        let permit = self.latch.try_begin("正在批改答题卡...")?;

        info!("{} 🔍 正在识别答题卡...", ctx);
        let data = self.analyze(&permit, image, ScanMode::Student).await?;

        let (answers, stats) = normalizer::normalize_with_stats(&data.answers);
        self.log_normalize_stats(ctx, &stats);

        if answers.is_empty() {
            warn!("{} ⚠️ 未检测到有效作答", ctx);
            return Err(WorkflowError::NoAnswersDetected);
        }

        let result = grader::grade_normalized(&key, &data, &answers, Local::now());

        if self.verbose_logging {
            info!("{} 答题明细:\n{}", ctx, answer_grid::render(&result, &key));
        }

        ensure_not_cancelled(&permit, ctx)?;
        let recorded = self
            .store
            .record_result_for(key.generation, result)
            .map_err(|e| {
                warn!("{} ⚠️ {}", ctx, e);
                e
            })?;

        info!(
            "{} ✓ 批改完成: {} 得分 {} ({}/{})",
            ctx,
            recorded.display_name(),
            recorded.score,
            recorded.correct_count,
            recorded.total_questions
        );

        Ok(recorded)
    }

    /// 调用识别服务，可被 `cancel` 中断
    async fn analyze(
        &self,
        permit: &ProcessingPermit,
        image: &SheetImage,
        mode: ScanMode,
    ) -> Result<ExamData, WorkflowError> {
        let cancelled = self.cancel.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();

        // 在 enable 之前到达的取消只留下了标记
        if permit.is_cancelled() {
            warn!("识别已取消: {}", image.file_name);
            return Err(WorkflowError::Cancelled);
        }

        tokio::select! {
            result = self.oracle.analyze(image, mode) => Ok(result?),
            _ = &mut cancelled => {
                warn!("识别已取消: {}", image.file_name);
                Err(WorkflowError::Cancelled)
            }
        }
    }

    fn log_normalize_stats(&self, ctx: &ScanCtx, stats: &NormalizeStats) {
        debug!(
            "{} 归一化: 接受 {} 条, 题号非法 {} 条, 重复 {} 条, 非标准选项 {} 条",
            ctx, stats.accepted, stats.invalid_numbers, stats.duplicates, stats.nonstandard_options
        );
    }
}

fn ensure_not_cancelled(permit: &ProcessingPermit, ctx: &ScanCtx) -> Result<(), WorkflowError> {
    if permit.is_cancelled() {
        warn!("{} ⚠️ 扫描已取消，丢弃结果", ctx);
        return Err(WorkflowError::Cancelled);
    }
    Ok(())
}
