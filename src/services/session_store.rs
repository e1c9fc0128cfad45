//! 会话存储 - 业务能力层
//!
//! 持有当前标准答案和本次会话的批改历史：
//! - 标准答案只能通过 `set_key` / `clear_key` 整体替换
//! - 历史记录按时间倒序排列（最新的在最前面），记录后不再修改
//! - 读操作返回 `Arc` 快照，持有快照期间不受后续写入影响

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use crate::error::SessionError;
use crate::models::{AnswerSet, ExamKey, GradedResult};

#[derive(Debug, Default)]
struct SessionState {
    current_key: Option<Arc<ExamKey>>,
    key_generation: u64,
    history: VecDeque<Arc<GradedResult>>,
    selected: Option<Arc<GradedResult>>,
}

/// 会话存储
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// 创建空的会话存储
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// 设置标准答案，整体替换旧值，不影响历史记录
    pub fn set_key(&self, answers: AnswerSet) -> Arc<ExamKey> {
        let mut state = self.write();
        state.key_generation += 1;
        let key = Arc::new(ExamKey::new(answers, state.key_generation));
        state.current_key = Some(key.clone());

        info!(
            "✓ 标准答案已设置: {} 道题 (版本 {})",
            key.total_questions(),
            key.generation
        );
        key
    }

    /// 清除标准答案
    pub fn clear_key(&self) {
        let mut state = self.write();
        state.key_generation += 1;
        state.current_key = None;
        info!("标准答案已清除");
    }

    /// 当前标准答案的快照
    pub fn current_key(&self) -> Option<Arc<ExamKey>> {
        self.read().current_key.clone()
    }

    /// 当前标准答案的快照，未设置时报错
    pub fn require_key(&self) -> Result<Arc<ExamKey>, SessionError> {
        self.current_key().ok_or(SessionError::NoActiveKey)
    }

    pub fn has_key(&self) -> bool {
        self.read().current_key.is_some()
    }

    /// 当前标准答案版本号
    pub fn key_generation(&self) -> u64 {
        self.read().key_generation
    }

    /// 记录批改结果：插入到历史记录最前面，并设为当前选中的结果
    pub fn record_result(&self, result: GradedResult) -> Arc<GradedResult> {
        let mut state = self.write();
        Self::push_result(&mut state, result)
    }

    /// 记录批改结果，但仅当标准答案自扫描开始以来未被替换或清除
    ///
    /// 版本不一致时丢弃结果，不修改任何状态
    pub fn record_result_for(
        &self,
        key_generation: u64,
        result: GradedResult,
    ) -> Result<Arc<GradedResult>, SessionError> {
        let mut state = self.write();
        if state.key_generation != key_generation {
            return Err(SessionError::StaleKey {
                expected: key_generation,
                current: state.key_generation,
            });
        }
        Ok(Self::push_result(&mut state, result))
    }

    fn push_result(state: &mut SessionState, result: GradedResult) -> Arc<GradedResult> {
        let result = Arc::new(result);
        state.history.push_front(result.clone());
        state.selected = Some(result.clone());
        debug!("历史记录新增一条，共 {} 条", state.history.len());
        result
    }

    /// 把历史记录中的某一条重新设为当前选中的结果，不修改历史记录
    ///
    /// 索引按时间倒序计算，0 为最新的一条
    pub fn select_from_history(&self, index: usize) -> Result<Arc<GradedResult>, SessionError> {
        let mut state = self.write();
        let len = state.history.len();
        let result = state
            .history
            .get(index)
            .cloned()
            .ok_or(SessionError::HistoryIndexOutOfRange { index, len })?;
        state.selected = Some(result.clone());
        Ok(result)
    }

    /// 当前选中的结果
    pub fn selected(&self) -> Option<Arc<GradedResult>> {
        self.read().selected.clone()
    }

    /// 历史记录快照（最新的在最前面）
    pub fn history(&self) -> Vec<Arc<GradedResult>> {
        self.read().history.iter().cloned().collect()
    }

    pub fn history_len(&self) -> usize {
        self.read().history.len()
    }
}
