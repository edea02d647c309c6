use serde::Deserialize;

/// Serper 搜索结果中的一条
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// Serper `/search` 接口的响应，只保留用得到的字段
#[derive(Debug, Default, Deserialize)]
pub struct SerperResponse {
    #[serde(default)]
    pub organic: Vec<SearchHit>,
}
