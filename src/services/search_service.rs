/// 网页搜索服务
///
/// 通过 Serper 接口获取补充信息，帮助模型挑选 ATS 关键词
use crate::config::Config;
use crate::error::GenerationError;
use crate::models::search::{SearchHit, SerperResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

const SERVICE: &str = "Serper";

/// 网页搜索能力
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, GenerationError>;
}

/// 搜索服务
pub struct SearchService {
    client: Client,
    api_key: String,
    api_url: String,
    num_results: usize,
}

impl SearchService {
    /// 创建新的搜索服务
    ///
    /// 没有配置 `SERPER_API_KEY` 时直接失败，不会发出任何请求。
    pub fn new(config: &Config) -> Result<Self, GenerationError> {
        let api_key = config
            .serper_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerationError::missing_credentials("SERPER_API_KEY"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.search_timeout_secs))
            .build()
            .map_err(|e| GenerationError::network(SERVICE, e))?;

        Ok(Self {
            client,
            api_key,
            api_url: config.serper_api_url.clone(),
            num_results: config.search_results,
        })
    }
}

#[async_trait]
impl WebSearch for SearchService {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, GenerationError> {
        debug!("Serper 搜索: {}", query);

        let response = self
            .client
            .post(&self.api_url)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query, "num": self.num_results }))
            .send()
            .await
            .map_err(|e| GenerationError::network(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Serper 返回 {}: {}", status, body);
            return Err(classify_status(status, body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::network(SERVICE, e))?;

        let hits = parse_hits(&body, self.num_results)?;
        debug!("Serper 返回 {} 条结果", hits.len());
        Ok(hits)
    }
}

fn classify_status(status: StatusCode, message: String) -> GenerationError {
    let service = SERVICE.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GenerationError::Authentication { service, message }
        }
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited { service, message },
        _ => GenerationError::Api {
            service,
            message: format!("HTTP {}: {}", status.as_u16(), message),
        },
    }
}

/// 解析响应体，丢弃没有摘要的结果
fn parse_hits(body: &str, limit: usize) -> Result<Vec<SearchHit>, GenerationError> {
    let response: SerperResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::malformed(SERVICE, format!("无法解析搜索结果: {}", e)))?;

    Ok(response
        .organic
        .into_iter()
        .filter(|hit| !hit.snippet.trim().is_empty())
        .take(limit)
        .collect())
}
