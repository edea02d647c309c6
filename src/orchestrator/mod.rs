//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::pipeline (App：读取 → 提示词 → 生成 → 渲染)
//!     ↓
//! workflow::ResumeFlow (搜索 → 模型 → 解析 → 润色)
//!     ↓
//! services (能力层：prompt / llm / search / parser / renderer)
//!     ↓
//! models (数据结构与文件读取)
//! ```

pub mod pipeline;

pub use pipeline::{App, RunSummary};
