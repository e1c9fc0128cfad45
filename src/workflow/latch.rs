//! 处理中互斥锁
//!
//! 同一时间只允许一次扫描在进行。后来的扫描直接被拒绝，不排队。
//! 许可在所有退出路径（成功、失败、取消）上随 drop 自动释放。
//!
//! 状态和取消标记放在同一把锁里：加锁后才获取许可，
//! 所以只要 `is_processing()` 为真，取消请求就一定会落到这次处理上。

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::WorkflowError;

/// 当前处理状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingState {
    pub is_processing: bool,
    pub status_message: String,
}

#[derive(Debug)]
struct ActiveStatus {
    message: String,
    cancelled: bool,
}

type SharedStatus = Arc<Mutex<Option<ActiveStatus>>>;

fn lock_status(status: &SharedStatus) -> MutexGuard<'_, Option<ActiveStatus>> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 单许可互斥锁
#[derive(Debug, Clone)]
pub struct ProcessingLatch {
    semaphore: Arc<Semaphore>,
    status: SharedStatus,
}

impl ProcessingLatch {
    pub fn new() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
            status: Arc::new(Mutex::new(None)),
        }
    }

    /// 尝试开始处理
    ///
    /// 已有处理在进行时返回 `WorkflowError::Busy`
    pub fn try_begin(&self, message: impl Into<String>) -> Result<ProcessingPermit, WorkflowError> {
        let mut status = lock_status(&self.status);

        let permit = self
            .semaphore
            .clone()
            .try_acquire_owned()
            .map_err(|_| WorkflowError::Busy)?;

        *status = Some(ActiveStatus {
            message: message.into(),
            cancelled: false,
        });

        Ok(ProcessingPermit {
            _permit: permit,
            status: self.status.clone(),
        })
    }

    pub fn is_processing(&self) -> bool {
        lock_status(&self.status).is_some()
    }

    /// 标记当前处理为已取消
    ///
    /// # 返回
    /// 没有处理在进行时返回 false
    pub fn request_cancel(&self) -> bool {
        match lock_status(&self.status).as_mut() {
            Some(active) => {
                active.cancelled = true;
                true
            }
            None => false,
        }
    }

    /// 当前状态快照
    pub fn state(&self) -> ProcessingState {
        match lock_status(&self.status).as_ref() {
            Some(active) => ProcessingState {
                is_processing: true,
                status_message: active.message.clone(),
            },
            None => ProcessingState::default(),
        }
    }
}

impl Default for ProcessingLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// 处理许可，drop 时清除状态并释放
#[derive(Debug)]
pub struct ProcessingPermit {
    _permit: OwnedSemaphorePermit,
    status: SharedStatus,
}

impl ProcessingPermit {
    /// 本次处理是否已被取消
    pub fn is_cancelled(&self) -> bool {
        lock_status(&self.status)
            .as_ref()
            .is_some_and(|active| active.cancelled)
    }
}

impl Drop for ProcessingPermit {
    fn drop(&mut self) {
        // 先清状态，字段随后 drop 时才释放许可
        *lock_status(&self.status) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_rejected() {
        let latch = ProcessingLatch::new();
        let permit = latch.try_begin("正在批改答题卡...").unwrap();

        assert!(latch.is_processing());
        assert!(matches!(latch.try_begin("again"), Err(WorkflowError::Busy)));
        assert_eq!(
            latch.state(),
            ProcessingState {
                is_processing: true,
                status_message: "正在批改答题卡...".to_string(),
            }
        );

        drop(permit);

        assert!(!latch.is_processing());
        assert_eq!(latch.state(), ProcessingState::default());
        assert!(latch.try_begin("again").is_ok());
    }

    #[test]
    fn test_released_on_early_return() {
        fn failing_step(latch: &ProcessingLatch) -> Result<(), WorkflowError> {
            let _permit = latch.try_begin("处理中")?;
            Err(WorkflowError::NoAnswersDetected)
        }

        let latch = ProcessingLatch::new();
        assert!(failing_step(&latch).is_err());
        assert!(!latch.is_processing());
    }

    #[test]
    fn test_cancel_marks_only_the_active_permit() {
        let latch = ProcessingLatch::new();
        assert!(!latch.request_cancel());

        let permit = latch.try_begin("正在批改答题卡...").unwrap();
        assert!(!permit.is_cancelled());
        assert!(latch.request_cancel());
        assert!(permit.is_cancelled());
        drop(permit);

        // 上一次的取消不会带到下一次处理
        let next = latch.try_begin("正在批改答题卡...").unwrap();
        assert!(!next.is_cancelled());
    }
}
