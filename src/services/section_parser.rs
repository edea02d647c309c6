//! 章节解析 - 业务能力层
//!
//! 把模型返回的文本按章节标题切分成 `StructuredResume`

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::GenerationError;
use crate::models::{ResumeSection, StructuredResume};

/// 标题两侧的 markdown 修饰：`## `、`**`、`1. `、结尾的冒号
static HEADING_DECORATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[#*_\s]*(?:\d+[.)]\s+)?|[*_:\s]+$").unwrap());

/// 识别章节标题
///
/// 去掉修饰后整行必须等于某个标题，`Skills: Kafka, Spark` 这类正文行不算。
pub fn detect_heading(line: &str) -> Option<ResumeSection> {
    let cleaned = HEADING_DECORATION.replace_all(line, "");
    ResumeSection::from_heading(&cleaned)
}

/// 解析模型输出
///
/// - 第一个标题之前的内容会被忽略
/// - 同一章节出现多次时内容合并
/// - 一个章节都没有识别出来时视为响应格式错误
pub fn parse_sections(text: &str) -> Result<StructuredResume, GenerationError> {
    if text.trim().is_empty() {
        return Err(GenerationError::malformed("LLM", "返回内容为空"));
    }

    let mut resume = StructuredResume::default();
    let mut current: Option<ResumeSection> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();

        if let Some(section) = detect_heading(line) {
            if let Some(prev) = current {
                resume.push(prev, &buffer.join("\n"));
            }
            current = Some(section);
            buffer.clear();
        } else if !line.is_empty() && current.is_some() {
            buffer.push(line);
        }
    }

    if let Some(prev) = current {
        resume.push(prev, &buffer.join("\n"));
    }

    if resume.is_empty() {
        return Err(GenerationError::malformed(
            "LLM",
            "返回内容中没有任何可识别的章节标题",
        ));
    }

    Ok(resume)
}
