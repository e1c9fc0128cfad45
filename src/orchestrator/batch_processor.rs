//! 批量阅卷处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责准备标准答案并逐张批改答题卡。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、创建报告文件、创建识别服务和会话存储
//! 2. **准备标准答案**：优先加载已保存的 TOML，否则扫描标准答案卡
//! 3. **批量加载**：扫描并加载所有待批改的答题卡图片
//! 4. **逐张处理**：同一时间只有一次识别在进行
//! 5. **全局统计**：汇总所有答题卡的批改结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单张答题卡的细节
//! - **向下委托**：委托 sheet_processor 处理单张答题卡

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{self, SheetImage};
use crate::orchestrator::sheet_processor;
use crate::services::{LlmService, ReportWriter, SessionStore};
use crate::utils::logging::{init_log_file, log_sheets_loaded, log_startup, print_final_stats};
use crate::workflow::{ScanCtx, ScanFlow};

/// 应用主结构
pub struct App {
    config: Config,
    flow: ScanFlow<LlmService>,
    report_writer: ReportWriter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        // 初始化报告文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        let store = Arc::new(SessionStore::new());
        let flow = ScanFlow::new(LlmService::new(&config), store)
            .with_verbose_logging(config.verbose_logging);
        let report_writer = ReportWriter::with_path(&config.output_log_file);

        Ok(Self {
            config,
            flow,
            report_writer,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        self.prepare_key().await?;

        let sheets = self.load_sheets().await?;

        if sheets.is_empty() {
            warn!("⚠️ 没有找到待批改的答题卡，程序结束");
            return Ok(());
        }

        log_sheets_loaded(sheets.len());

        let stats = self.process_all_sheets(&sheets).await?;

        self.log_history();

        print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(())
    }

    /// 准备标准答案
    async fn prepare_key(&self) -> Result<()> {
        if let Some(key_file) = &self.config.key_file {
            let path = Path::new(key_file);
            if path.exists() {
                info!("\n📄 正在加载已保存的标准答案: {}", key_file);
                let answers = models::load_key_from_toml(path).await?;
                anyhow::ensure!(!answers.is_empty(), "标准答案文件中没有任何题目: {}", key_file);
                self.flow.store().set_key(answers);
                return Ok(());
            }
        }

        info!("\n📷 正在扫描标准答案卡: {}", self.config.key_image_path);
        let image = models::load_sheet_image(Path::new(&self.config.key_image_path)).await?;
        let ctx = ScanCtx::key(&image.file_name);
        let key = self
            .flow
            .scan_key(&image, &ctx)
            .await
            .with_context(|| format!("标准答案识别失败: {}", self.config.key_image_path))?;

        if let Some(key_file) = &self.config.key_file {
            models::save_key_to_toml(Path::new(key_file), &key.answers).await?;
        }

        Ok(())
    }

    /// 加载答题卡
    async fn load_sheets(&self) -> Result<Vec<SheetImage>> {
        info!("\n📁 正在扫描待批改的答题卡...");
        Ok(models::load_all_sheet_images(&self.config.sheets_folder).await?)
    }

    /// 逐张处理所有答题卡
    async fn process_all_sheets(&self, sheets: &[SheetImage]) -> Result<ProcessingStats> {
        let mut stats = ProcessingStats {
            total: sheets.len(),
            ..Default::default()
        };

        for (idx, sheet) in sheets.iter().enumerate() {
            let sheet_index = idx + 1;
            info!("\n{}", "─".repeat(60));
            info!("📄 第 {}/{} 张: {}", sheet_index, stats.total, sheet.file_name);

            if sheet_processor::process_sheet(&self.flow, &self.report_writer, sheet, sheet_index)
                .await?
            {
                stats.success += 1;
            } else {
                stats.failed += 1;
            }
        }

        Ok(stats)
    }

    /// 输出本次会话的批改记录（最新的在最前面）
    fn log_history(&self) {
        let history = self.flow.store().history();
        if history.is_empty() {
            return;
        }

        info!("\n{}", "=".repeat(60));
        info!("📋 最近批改记录");
        for result in &history {
            let mark = if result.is_passing() { "✅" } else { "❌" };
            info!(
                "{} {} {} - {} 分",
                mark,
                result.timestamp.format("%H:%M:%S"),
                result.display_name(),
                result.score
            );
        }
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
}
