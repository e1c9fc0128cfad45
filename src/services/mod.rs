pub mod answer_grid;
pub mod grader;
pub mod llm_service;
pub mod normalizer;
pub mod oracle;
pub mod report_writer;
pub mod session_store;

pub use llm_service::LlmService;
pub use normalizer::NormalizeStats;
pub use oracle::ExtractionOracle;
pub use report_writer::ReportWriter;
pub use session_store::SessionStore;
