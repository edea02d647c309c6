//! 简历生成流程 - 流程层
//!
//! 核心职责：定义"一份简历"从提示词到结构化结果的完整流程
//!
//! 流程顺序：
//! 1. 网页搜索补充上下文（可选）
//! 2. 调用模型整理简历
//! 3. 按章节标题解析
//! 4. 逐章节润色（可选）

use tracing::{info, warn};

use crate::error::GenerationError;
use crate::models::{PromptPayload, RawResume, ResumeSection, StructuredResume};
use crate::services::prompt_builder::{build_search_query, build_section_polish_prompt};
use crate::services::section_parser::{detect_heading, parse_sections};
use crate::services::{ChatModel, WebSearch};

/// 简历生成流程
///
/// - 不持有任何文件资源
/// - 只依赖业务能力（`ChatModel` / `WebSearch`）
pub struct ResumeFlow<C, S> {
    chat: C,
    search: Option<S>,
    polish_sections: bool,
}

impl<C: ChatModel, S: WebSearch> ResumeFlow<C, S> {
    pub fn new(chat: C, search: Option<S>, polish_sections: bool) -> Self {
        Self {
            chat,
            search,
            polish_sections,
        }
    }

    pub async fn run(
        &self,
        raw: &RawResume,
        payload: PromptPayload,
    ) -> Result<StructuredResume, GenerationError> {
        let payload = match &self.search {
            Some(search) => {
                let query = build_search_query(raw);
                info!("🔍 网页搜索: {}", query);
                let hits = search.search(&query).await?;
                info!("✓ 搜索完成，获得 {} 条补充信息", hits.len());
                payload.with_context(&hits)
            }
            None => payload,
        };

        info!("🤖 调用模型整理简历...");
        let text = self
            .chat
            .send_to_llm(&payload.user, Some(&payload.system))
            .await?;

        let mut resume = parse_sections(&text)?;
        info!("✓ 识别出 {} 个章节", resume.len());

        let missing = resume.missing();
        if !missing.is_empty() {
            let names: Vec<_> = missing.iter().map(|s| s.heading()).collect();
            warn!("⚠️ 模型输出缺少章节: {}，将直接省略", names.join(", "));
        }

        if self.polish_sections {
            self.polish(&mut resume).await?;
        }

        Ok(resume)
    }

    /// 逐个章节调用模型润色
    async fn polish(&self, resume: &mut StructuredResume) -> Result<(), GenerationError> {
        let sections: Vec<(ResumeSection, String)> = resume
            .sections()
            .map(|(section, body)| (section, body.to_string()))
            .collect();

        for (section, body) in sections {
            info!("✏️ 润色章节: {}", section);
            let (user_message, system_message) = build_section_polish_prompt(section, &body);
            let polished = self
                .chat
                .send_to_llm(&user_message, Some(&system_message))
                .await?;

            let polished = strip_repeated_heading(section, &polished);
            if polished.is_empty() {
                warn!("章节 {} 润色结果为空，保留原内容", section);
                continue;
            }
            resume.replace(section, polished);
        }

        Ok(())
    }
}

/// 模型有时会把章节标题重复写在第一行
fn strip_repeated_heading(section: ResumeSection, text: &str) -> String {
    let mut lines = text.trim().lines().peekable();
    if let Some(first) = lines.peek() {
        if detect_heading(first.trim()) == Some(section) {
            lines.next();
        }
    }
    lines.collect::<Vec<_>>().join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchHit;
    use crate::services::prompt_builder::{build_prompt, PromptOptions};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 按顺序返回固定回复，并记录收到的用户消息
    struct ScriptedChat {
        replies: Mutex<VecDeque<Result<String, GenerationError>>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedChat {
        fn new(replies: Vec<Result<String, GenerationError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedChat {
        async fn send_to_llm(
            &self,
            user_message: &str,
            _system_message: Option<&str>,
        ) -> Result<String, GenerationError> {
            self.seen.lock().unwrap().push(user_message.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::malformed("test", "no reply")))
        }
    }

    struct FixedSearch(Vec<SearchHit>);

    #[async_trait]
    impl WebSearch for FixedSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, GenerationError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSearch;

    #[async_trait]
    impl WebSearch for FailingSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, GenerationError> {
            Err(GenerationError::Authentication {
                service: "Serper".into(),
                message: "bad key".into(),
            })
        }
    }

    const MODEL_OUTPUT: &str =
        "Professional Profile\nEngineer\nRecent Experience\n• Acme\nEducation\nBSc\nSkills\n• Rust";

    fn raw() -> RawResume {
        RawResume::new("Jane Doe\nEngineer at Acme").unwrap()
    }

    fn payload() -> PromptPayload {
        build_prompt(&raw(), &PromptOptions::default())
    }

    #[tokio::test]
    async fn test_run_without_search() {
        let chat = ScriptedChat::new(vec![Ok(MODEL_OUTPUT.to_string())]);
        let flow: ResumeFlow<_, FixedSearch> = ResumeFlow::new(chat, None, false);

        let resume = flow.run(&raw(), payload()).await.unwrap();
        assert_eq!(resume.len(), 4);
        assert_eq!(flow.chat.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_hits_are_added_to_prompt() {
        let chat = ScriptedChat::new(vec![Ok(MODEL_OUTPUT.to_string())]);
        let search = FixedSearch(vec![SearchHit {
            title: "Keywords".into(),
            link: "https://example.com".into(),
            snippet: "Kubernetes".into(),
        }]);
        let flow = ResumeFlow::new(chat, Some(search), false);

        flow.run(&raw(), payload()).await.unwrap();
        let seen = flow.chat.seen.lock().unwrap();
        assert!(seen[0].contains("Kubernetes"));
    }

    #[tokio::test]
    async fn test_search_failure_aborts_before_model_call() {
        let chat = ScriptedChat::new(vec![Ok(MODEL_OUTPUT.to_string())]);
        let flow = ResumeFlow::new(chat, Some(FailingSearch), false);

        let err = flow.run(&raw(), payload()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Authentication { .. }));
        assert!(flow.chat.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unstructured_reply_is_malformed() {
        let chat = ScriptedChat::new(vec![Ok("Sure! Here is your resume.".to_string())]);
        let flow: ResumeFlow<_, FixedSearch> = ResumeFlow::new(chat, None, false);

        let err = flow.run(&raw(), payload()).await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_polish_replaces_each_section() {
        let chat = ScriptedChat::new(vec![
            Ok("Professional Profile\nEngineer\nSkills\n• Rust".to_string()),
            Ok("Professional Profile\nSeasoned engineer".to_string()),
            Ok("• Rust (5 years)".to_string()),
        ]);
        let flow: ResumeFlow<_, FixedSearch> = ResumeFlow::new(chat, None, true);

        let resume = flow.run(&raw(), payload()).await.unwrap();
        assert_eq!(
            resume.get(ResumeSection::ProfessionalProfile),
            Some("Seasoned engineer")
        );
        assert_eq!(resume.get(ResumeSection::Skills), Some("• Rust (5 years)"));
        assert_eq!(flow.chat.seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_strip_repeated_heading_only_for_same_section() {
        assert_eq!(
            strip_repeated_heading(ResumeSection::Skills, "## Skills\n• Rust"),
            "• Rust"
        );
        assert_eq!(
            strip_repeated_heading(ResumeSection::Skills, "Education\nBSc"),
            "Education\nBSc"
        );
    }
}
