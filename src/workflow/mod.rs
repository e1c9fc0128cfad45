pub mod latch;
pub mod scan_ctx;
pub mod scan_flow;

pub use latch::{ProcessingLatch, ProcessingPermit, ProcessingState};
pub use scan_ctx::ScanCtx;
pub use scan_flow::ScanFlow;
