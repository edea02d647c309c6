//! # ATS Resume Writer
//!
//! 把一份纯文本简历整理成 ATS 友好的 docx 文档
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - `RawResume`、`PromptPayload`、`StructuredResume` 等数据结构
//! - `models/loaders` - 读取简历文本和示例 docx
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，互不依赖
//! - `prompt_builder` - 构建提示词（纯函数）
//! - `LlmService` - 调用 OpenAI 兼容模型
//! - `SearchService` - Serper 网页搜索
//! - `section_parser` - 按章节标题解析模型输出
//! - `DocxRenderer` - 写出 docx
//!
//! ### ③ 流程层（Workflow）
//! - `ResumeFlow` - 搜索 → 模型 → 解析 → 润色
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 串联全部阶段，任何一步失败即终止
//!
//! ## 模块结构
//!
//! - `config` - 默认值 → `resume_writer.toml` → 环境变量
//! - `error` - 分层错误类型
//! - `logger` / `utils::logging` - 日志初始化与输出格式
//! - `models` / `services` / `workflow` / `orchestrator` - 上述四层

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{PromptPayload, RawResume, ResumeSection, StructuredResume};
pub use orchestrator::{App, RunSummary};
pub use workflow::ResumeFlow;
