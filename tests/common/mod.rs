use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use omr_grader::{ExamData, ExtractionOracle, OracleError, RawAnswer, ScanMode, SheetImage};

/// 返回固定数据的识别服务
///
/// 设置 gate 后，每次识别会先通知 `started`，再等待 gate 放行
pub struct FakeOracle {
    replies: Mutex<VecDeque<Result<ExamData, OracleError>>>,
    calls: Arc<AtomicUsize>,
    started: Arc<Notify>,
    gate: Option<Arc<Notify>>,
}

impl FakeOracle {
    pub fn new(replies: Vec<Result<ExamData, OracleError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Arc::new(AtomicUsize::new(0)),
            started: Arc::new(Notify::new()),
            gate: None,
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn started(&self) -> Arc<Notify> {
        self.started.clone()
    }
}

impl ExtractionOracle for FakeOracle {
    async fn analyze(&self, _image: &SheetImage, _mode: ScanMode) -> Result<ExamData, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            self.started.notify_one();
            gate.notified().await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(OracleError::EmptyResponse {
                model: "fake".to_string(),
            }));
        reply
    }
}

pub fn exam(pairs: &[(u32, Option<&str>)]) -> ExamData {
    ExamData::new(pairs.iter().map(|(q, s)| RawAnswer::new(*q, *s)).collect())
}

pub fn sheet(name: &str) -> SheetImage {
    SheetImage::new(name, "image/jpeg", b"fake".to_vec())
}

pub fn oracle_failure() -> OracleError {
    OracleError::EmptyResponse {
        model: "fake".to_string(),
    }
}
