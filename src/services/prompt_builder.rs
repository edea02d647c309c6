//! 提示词构建 - 业务能力层
//!
//! 纯函数：相同输入永远得到相同输出，不做任何 I/O。

use crate::models::{ExampleResume, PromptPayload, RawResume, ResumeSection, SearchHit};
use crate::utils::logging::truncate_text;

/// 搜索关键词中标题部分的最大长度
const MAX_QUERY_HEADLINE_CHARS: usize = 80;

/// 构建提示词时的可选参数
#[derive(Debug, Clone)]
pub struct PromptOptions {
    /// 输出语言
    pub language: String,
    /// 示例简历文本，作为格式参考
    pub example: Option<ExampleResume>,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            example: None,
        }
    }
}

/// 构建整理简历的提示词
pub fn build_prompt(raw: &RawResume, options: &PromptOptions) -> PromptPayload {
    let headings = ResumeSection::ALL
        .iter()
        .map(|s| s.heading())
        .collect::<Vec<_>>()
        .join(", ");

    let system = format!(
        "You are a Resume Organizer. Your goal is to create an AI and ATS optimized resume in {language}.\n\
         - Organize the resume into sections: {headings}\n\
         - In the Recent Experience section, summarize the latest work experiences\n\
         - In the Education section, summarize educational background\n\
         - In the Skills section, list skills used in professional projects (from Recent Experience)\n\
         - Include certifications in the Professional Profile section\n\
         - Include languages in the Skills section\n\
         - Aim to fit everything on one page\n\
         - Use clear section headings and consistent formatting; avoid tables and complex layouts",
        language = options.language,
        headings = headings,
    );

    let mut user = format!(
        "Rewrite the resume below in {language}.\n\n\
         Output format:\n\
         - Start each section with its exact heading on its own line: {headings}\n\
         - Put the section content on the following lines\n\
         - Start every bullet item with \"• \"\n\
         - Omit a section only if the resume has no information for it\n\
         - Return only the resume content without any additional commentary\n\n\
         Resume:\n\
         <<<\n{text}\n>>>",
        language = options.language,
        headings = headings,
        text = raw.text().trim(),
    );

    if let Some(example) = &options.example {
        user.push_str(&format!(
            "\n\nFollow the structure and tone of this example resume while keeping ATS compatibility:\n\
             <<<\n{}\n>>>",
            example.text.trim()
        ));
    }

    PromptPayload { system, user }
}

impl PromptPayload {
    /// 附加搜索结果作为补充信息，没有结果时原样返回
    pub fn with_context(mut self, hits: &[SearchHit]) -> Self {
        if hits.is_empty() {
            return self;
        }

        self.user.push_str(
            "\n\nSupplementary context from a web search (use it only to choose ATS keywords; \
             never add facts that are not in the resume):\n",
        );
        for (i, hit) in hits.iter().enumerate() {
            self.user.push_str(&format!(
                "{}. {} ({})\n   {}\n",
                i + 1,
                hit.title.trim(),
                hit.link.trim(),
                hit.snippet.trim()
            ));
        }
        self
    }
}

/// 根据简历标题生成搜索关键词
pub fn build_search_query(raw: &RawResume) -> String {
    format!(
        "ATS resume keywords for {}",
        truncate_text(raw.headline(), MAX_QUERY_HEADLINE_CHARS)
    )
}

/// 构建单个章节的润色提示词
///
/// 返回 (user_message, system_message)
pub fn build_section_polish_prompt(section: ResumeSection, content: &str) -> (String, String) {
    let system_message =
        "You are a Resume Formatter. You format resume sections to be AI and ATS friendly."
            .to_string();

    let user_message = format!(
        "Format the following {section} section content for a resume, ensuring it is:\n\
         1. Concise and impactful\n\
         2. Uses action verbs\n\
         3. Quantifies achievements where possible\n\
         4. Is ATS-friendly\n\
         5. Maintains professional tone\n\n\
         Keep bullet items starting with \"• \". Do not repeat the section heading.\n\n\
         Content:\n\
         {content}\n\n\
         Return only the formatted content without any additional commentary.",
        section = section.heading(),
        content = content.trim(),
    );

    (user_message, system_message)
}
