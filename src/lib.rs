//! # OMR Grader
//!
//! 一个用视觉大模型识别答题卡并自动判分的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 作答、标准答案、批改结果，以及图片/TOML 加载
//! - `Selection` - 单题作答（选项 / 未作答 / 多涂）
//! - `AnswerSet` - 题号唯一、按题号升序的作答集合
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单张答题卡
//! - `ExtractionOracle` / `LlmService` - 图片 → 原始作答
//! - `normalizer` - 原始作答 → `AnswerSet`
//! - `grader` - 以标准答案驱动的判分
//! - `SessionStore` - 当前标准答案 + 批改历史
//! - `ReportWriter` - 写批改报告
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次拍照识别"的完整处理流程
//! - `ProcessingLatch` - 同一时间只允许一次识别
//! - `ScanFlow` - 流程编排（识别 → 归一化 → 判分 → 记录）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 准备标准答案并批量阅卷
//! - `orchestrator/sheet_processor` - 单张答题卡处理器
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, OracleError, SessionError, WorkflowError};
pub use models::{Answer, AnswerSet, ExamData, ExamKey, GradedResult, RawAnswer, ScanMode, Selection, SheetImage};
pub use orchestrator::App;
pub use services::{ExtractionOracle, LlmService, SessionStore};
pub use workflow::{ProcessingState, ScanCtx, ScanFlow};
