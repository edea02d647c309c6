//! 简历生成流水线 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，按顺序执行四个阶段：
//!
//! 1. **读取输入**：读取原始简历文本和可选的示例简历
//! 2. **构建提示词**：纯函数，不做 I/O
//! 3. **调用模型**：搜索（可选）→ 模型整理 → 章节解析 → 润色（可选）
//! 4. **渲染文档**：写出 docx
//!
//! 任何阶段失败都会终止后续阶段，输出路径上要么是完整文档，要么什么都没有。

use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{load_example_resume, load_raw_resume, ResumeSection};
use crate::services::{
    build_prompt, ChatModel, DocxRenderer, LlmService, PromptOptions, SearchService, WebSearch,
};
use crate::utils::logging::{log_stage, log_startup, print_final_stats};
use crate::workflow::ResumeFlow;

const TOTAL_STAGES: usize = 4;

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub sections: Vec<ResumeSection>,
    pub missing: Vec<ResumeSection>,
}

/// 应用主结构
pub struct App<C = LlmService, S = SearchService> {
    config: Config,
    flow: ResumeFlow<C, S>,
    renderer: DocxRenderer,
}

impl App {
    /// 初始化应用
    ///
    /// 缺少 API 凭证时在这里直接失败，不会发出任何网络请求。
    pub fn initialize(config: Config) -> AppResult<Self> {
        let chat = LlmService::new(&config)?;
        let search = if config.web_search {
            Some(SearchService::new(&config)?)
        } else {
            None
        };

        Ok(Self::with_services(config, chat, search))
    }
}

impl<C: ChatModel, S: WebSearch> App<C, S> {
    /// 使用指定的模型和搜索能力创建应用
    pub fn with_services(config: Config, chat: C, search: Option<S>) -> Self {
        let flow = ResumeFlow::new(chat, search, config.polish_sections);
        Self {
            config,
            flow,
            renderer: DocxRenderer::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunSummary> {
        let started = Instant::now();
        log_startup(&self.config);

        log_stage(1, TOTAL_STAGES, "📁 读取简历");
        let raw = load_raw_resume(&self.config.input_path).await?;
        let example = load_example_resume(&self.config.example_docx_path).await?;

        log_stage(2, TOTAL_STAGES, "🧩 构建提示词");
        let options = PromptOptions {
            language: self.config.language.clone(),
            example,
        };
        let payload = build_prompt(&raw, &options);

        log_stage(3, TOTAL_STAGES, "🤖 生成结构化简历");
        let resume = self.flow.run(&raw, payload).await?;

        log_stage(4, TOTAL_STAGES, "📝 渲染文档");
        self.renderer.write(&resume, &self.config.output_path).await?;

        let summary = RunSummary {
            output_path: self.config.output_path.clone(),
            sections: resume.sections().map(|(s, _)| s).collect(),
            missing: resume.missing(),
        };

        print_final_stats(
            &summary.output_path,
            &summary.sections,
            &summary.missing,
            started.elapsed(),
        );
        info!("✅ 全部完成");

        Ok(summary)
    }
}
