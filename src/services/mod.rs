pub mod docx_renderer;
pub mod llm_service;
pub mod prompt_builder;
pub mod search_service;
pub mod section_parser;

pub use docx_renderer::DocxRenderer;
pub use llm_service::{ChatModel, LlmService};
pub use prompt_builder::{build_prompt, PromptOptions};
pub use search_service::{SearchService, WebSearch};
pub use section_parser::parse_sections;
