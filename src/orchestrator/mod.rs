//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量阅卷和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量阅卷处理器
//! - 管理应用生命周期（初始化、运行）
//! - 准备标准答案（加载 TOML 或扫描标准答案卡）
//! - 批量加载答题卡图片（Vec<SheetImage>）
//! - 输出全局统计信息和批改记录
//!
//! ### `sheet_processor` - 单张答题卡处理器
//! - 调用 ScanFlow 识别并批改
//! - 写入报告
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<SheetImage>)
//!     ↓
//! sheet_processor (处理单张 SheetImage)
//!     ↓
//! workflow::ScanFlow (识别 → 归一化 → 判分 → 记录)
//!     ↓
//! services (能力层：oracle / normalizer / grader / session_store / report)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，sheet_processor 管单张
//! 2. **逐张处理**：同一时间只有一次识别在进行
//! 3. **向下依赖**：编排层 → workflow → services → models
//! 4. **无业务逻辑**：只做调度和统计，不做具体判分

pub mod batch_processor;
pub mod sheet_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use sheet_processor::process_sheet;
