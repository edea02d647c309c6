//! LLM 服务 - 业务能力层
//!
//! 只负责"调用模型"能力，不关心流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure、各类代理网关）

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::GenerationError;

const SERVICE: &str = "OpenAI";

/// 对话模型能力
///
/// 流程层只依赖这个 trait，测试时可以替换成固定回复。
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String, GenerationError>;
}

/// LLM 服务
///
/// 职责：
/// - 调用 OpenAI 兼容接口完成一次对话
/// - 把底层错误归类为 `GenerationError`
/// - 模型不存在时回退到备用模型（只回退一次，不做重试）
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    fallback_model: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    ///
    /// 没有配置 `OPENAI_API_KEY` 时直接失败，不会发出任何请求。
    pub fn new(config: &Config) -> Result<Self, GenerationError> {
        let api_key = config
            .llm_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerationError::missing_credentials("OPENAI_API_KEY"))?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.llm_api_base_url);

        Ok(Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            fallback_model: config.llm_fallback_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(
        &self,
        model: &str,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<Option<String>, OpenAIError> {
        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await?;

        Ok(response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone()))
    }
}

#[async_trait]
impl ChatModel for LlmService {
    /// 发送一次对话请求，返回去掉首尾空白的回复
    async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String, GenerationError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let result = match self
            .complete(&self.model_name, user_message, system_message)
            .await
        {
            Err(e) => match fallback_model(
                api_error_code(&e),
                &self.model_name,
                self.fallback_model.as_deref(),
            ) {
                Some(fallback) => {
                    warn!("模型 {} 不可用，改用 {}", self.model_name, fallback);
                    self.complete(fallback, user_message, system_message).await
                }
                None => Err(e),
            },
            other => other,
        };

        let content = result.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            classify_openai_error(e)
        })?;

        debug!("LLM API 调用成功");

        let content = content.unwrap_or_default();
        let content = content.trim();
        if content.is_empty() {
            return Err(GenerationError::malformed(SERVICE, "LLM 返回内容为空"));
        }

        Ok(content.to_string())
    }
}

fn api_error_code(err: &OpenAIError) -> Option<&str> {
    match err {
        OpenAIError::ApiError(api) => api.code.as_deref(),
        _ => None,
    }
}

/// 只有 `model_not_found` 才换模型，且备用模型必须和原模型不同
fn fallback_model<'a>(code: Option<&str>, model: &str, fallback: Option<&'a str>) -> Option<&'a str> {
    match (code, fallback) {
        (Some("model_not_found"), Some(fallback)) if fallback != model => Some(fallback),
        _ => None,
    }
}

/// 把 async-openai 的错误归类
fn classify_openai_error(err: OpenAIError) -> GenerationError {
    match err {
        OpenAIError::ApiError(api) => {
            let code = api.code.as_deref().unwrap_or_default();
            let kind = api.r#type.as_deref().unwrap_or_default();
            classify_api_error(code, kind, api.message)
        }
        OpenAIError::Reqwest(e) => GenerationError::network(SERVICE, e),
        OpenAIError::JSONDeserialize(..) => {
            GenerationError::malformed(SERVICE, "无法解析 API 响应")
        }
        other => GenerationError::Api {
            service: SERVICE.to_string(),
            message: other.to_string(),
        },
    }
}

fn classify_api_error(code: &str, kind: &str, message: String) -> GenerationError {
    let service = SERVICE.to_string();
    match (code, kind) {
        ("invalid_api_key", _) | (_, "authentication_error") => {
            GenerationError::Authentication { service, message }
        }
        ("rate_limit_exceeded", _) | ("insufficient_quota", _) | (_, "insufficient_quota") => {
            GenerationError::RateLimited { service, message }
        }
        _ if message.contains("Incorrect API key") => {
            GenerationError::Authentication { service, message }
        }
        _ => GenerationError::Api { service, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> Config {
        Config {
            llm_api_key: key.map(str::to_string),
            ..Config::default()
        }
    }

    #[test]
    fn test_missing_api_key_fails_before_any_request() {
        let err = LlmService::new(&config_with_key(None)).err().unwrap();
        assert!(matches!(
            err,
            GenerationError::MissingCredentials { ref var } if var == "OPENAI_API_KEY"
        ));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        assert!(LlmService::new(&config_with_key(Some("   "))).is_err());
    }

    #[test]
    fn test_new_uses_configured_model() {
        let service = LlmService::new(&config_with_key(Some("sk-test"))).unwrap();
        assert_eq!(service.model_name(), "gpt-4");
    }

    #[test]
    fn test_classify_invalid_key_as_authentication() {
        let err = classify_api_error("invalid_api_key", "invalid_request_error", "bad".into());
        assert!(matches!(err, GenerationError::Authentication { .. }));

        let err = classify_api_error("", "", "Incorrect API key provided: sk-***".into());
        assert!(matches!(err, GenerationError::Authentication { .. }));
    }

    #[test]
    fn test_classify_quota_as_rate_limited() {
        let err = classify_api_error("rate_limit_exceeded", "requests", "slow down".into());
        assert!(matches!(err, GenerationError::RateLimited { .. }));

        let err = classify_api_error("", "insufficient_quota", "quota".into());
        assert!(matches!(err, GenerationError::RateLimited { .. }));
    }

    #[test]
    fn test_classify_other_api_errors() {
        let err = classify_api_error("context_length_exceeded", "invalid_request_error", "x".into());
        assert!(matches!(err, GenerationError::Api { .. }));
    }

    #[test]
    fn test_model_not_found_switches_to_fallback() {
        assert_eq!(
            fallback_model(Some("model_not_found"), "gpt-4", Some("gpt-3.5-turbo")),
            Some("gpt-3.5-turbo")
        );
    }

    #[test]
    fn test_no_fallback_to_same_model() {
        assert_eq!(
            fallback_model(Some("model_not_found"), "gpt-3.5-turbo", Some("gpt-3.5-turbo")),
            None
        );
    }

    #[test]
    fn test_no_fallback_when_disabled_or_other_error() {
        assert_eq!(fallback_model(Some("model_not_found"), "gpt-4", None), None);
        assert_eq!(
            fallback_model(Some("rate_limit_exceeded"), "gpt-4", Some("gpt-3.5-turbo")),
            None
        );
        assert_eq!(fallback_model(None, "gpt-4", Some("gpt-3.5-turbo")), None);
    }

    #[test]
    fn test_api_error_code_only_for_api_errors() {
        let err = OpenAIError::ApiError(async_openai::error::ApiError {
            message: "The model `gpt-5` does not exist".into(),
            r#type: Some("invalid_request_error".into()),
            param: None,
            code: Some("model_not_found".into()),
        });
        assert_eq!(api_error_code(&err), Some("model_not_found"));

        let err = OpenAIError::InvalidArgument("bad".into());
        assert_eq!(api_error_code(&err), None);
    }

    /// 需要真实的 OPENAI_API_KEY
    #[tokio::test]
    #[ignore]
    async fn test_send_to_llm_simple() {
        let _ = tracing_subscriber::fmt::try_init();

        let service = LlmService::new(&Config::from_env()).expect("需要 OPENAI_API_KEY");
        let response = service
            .send_to_llm("Reply with the single word: ok", Some("You are terse."))
            .await
            .unwrap();

        assert!(!response.is_empty());
    }
}
