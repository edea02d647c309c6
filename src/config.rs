use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "resume_writer.toml";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 原始简历文本路径
    pub input_path: PathBuf,
    /// 输出 docx 路径
    pub output_path: PathBuf,
    /// 参考格式的示例简历（可选，不存在时跳过）
    pub example_docx_path: PathBuf,
    /// 输出简历使用的语言
    pub language: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 模型不存在时改用的模型，为空表示不回退
    pub llm_fallback_model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// 是否对每个章节再做一次润色
    pub polish_sections: bool,
    // --- 搜索配置 ---
    pub web_search: bool,
    pub serper_api_key: Option<String>,
    pub serper_api_url: String,
    pub search_results: usize,
    pub search_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("resume.txt"),
            output_path: PathBuf::from("output.docx"),
            example_docx_path: PathBuf::from("example.docx"),
            language: "English".to_string(),
            verbose_logging: false,
            llm_api_key: None,
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4".to_string(),
            llm_fallback_model: Some("gpt-3.5-turbo".to_string()),
            temperature: 0.2,
            max_tokens: 2048,
            polish_sections: false,
            web_search: true,
            serper_api_key: None,
            serper_api_url: "https://google.serper.dev/search".to_string(),
            search_results: 5,
            search_timeout_secs: 30,
        }
    }
}

/// 配置文件结构，所有字段都可省略
///
/// API 密钥只从环境变量读取，不放进配置文件。
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub example_docx_path: Option<PathBuf>,
    pub language: Option<String>,
    pub verbose_logging: Option<bool>,
    pub llm_api_base_url: Option<String>,
    pub llm_model_name: Option<String>,
    pub llm_fallback_model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub polish_sections: Option<bool>,
    pub web_search: Option<bool>,
    pub serper_api_url: Option<String>,
    pub search_results: Option<usize>,
    pub search_timeout_secs: Option<u64>,
}

impl Config {
    /// 按 默认值 → 配置文件 → 环境变量 的顺序加载配置
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let path = std::env::var("RESUME_WRITER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let base = match ConfigFile::read(&path)? {
            Some(file) => Self::default().merge_file(file),
            None => Self::default(),
        };

        Ok(base.merge_env())
    }

    /// 只使用默认值和环境变量
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// 用配置文件中出现的字段覆盖当前值
    pub fn merge_file(self, file: ConfigFile) -> Self {
        Self {
            input_path: file.input_path.unwrap_or(self.input_path),
            output_path: file.output_path.unwrap_or(self.output_path),
            example_docx_path: file.example_docx_path.unwrap_or(self.example_docx_path),
            language: file.language.unwrap_or(self.language),
            verbose_logging: file.verbose_logging.unwrap_or(self.verbose_logging),
            llm_api_base_url: file.llm_api_base_url.unwrap_or(self.llm_api_base_url),
            llm_model_name: file.llm_model_name.unwrap_or(self.llm_model_name),
            llm_fallback_model: match file.llm_fallback_model {
                Some(model) => non_blank(model),
                None => self.llm_fallback_model,
            },
            temperature: file.temperature.unwrap_or(self.temperature),
            max_tokens: file.max_tokens.unwrap_or(self.max_tokens),
            polish_sections: file.polish_sections.unwrap_or(self.polish_sections),
            web_search: file.web_search.unwrap_or(self.web_search),
            serper_api_url: file.serper_api_url.unwrap_or(self.serper_api_url),
            search_results: file.search_results.unwrap_or(self.search_results),
            search_timeout_secs: file.search_timeout_secs.unwrap_or(self.search_timeout_secs),
            ..self
        }
    }

    /// 用环境变量覆盖当前值，无法解析的值保持原样
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    /// 用 `var` 查到的变量覆盖当前值
    fn merge_vars(self, var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            input_path: var("RESUME_INPUT").map(PathBuf::from).unwrap_or(self.input_path),
            output_path: var("RESUME_OUTPUT").map(PathBuf::from).unwrap_or(self.output_path),
            example_docx_path: var("RESUME_EXAMPLE_DOCX")
                .map(PathBuf::from)
                .unwrap_or(self.example_docx_path),
            language: var("RESUME_LANGUAGE").unwrap_or(self.language),
            verbose_logging: parsed(var("VERBOSE_LOGGING")).unwrap_or(self.verbose_logging),
            llm_api_key: var("OPENAI_API_KEY").and_then(non_blank).or(self.llm_api_key),
            llm_api_base_url: var("OPENAI_API_BASE").unwrap_or(self.llm_api_base_url),
            llm_model_name: var("OPENAI_MODEL_NAME")
                .and_then(non_blank)
                .unwrap_or(self.llm_model_name),
            llm_fallback_model: match var("OPENAI_FALLBACK_MODEL") {
                Some(model) => non_blank(model),
                None => self.llm_fallback_model,
            },
            temperature: parsed(var("OPENAI_TEMPERATURE")).unwrap_or(self.temperature),
            max_tokens: parsed(var("OPENAI_MAX_TOKENS")).unwrap_or(self.max_tokens),
            polish_sections: parsed(var("POLISH_SECTIONS")).unwrap_or(self.polish_sections),
            web_search: parsed(var("WEB_SEARCH")).unwrap_or(self.web_search),
            serper_api_key: var("SERPER_API_KEY").and_then(non_blank).or(self.serper_api_key),
            serper_api_url: self.serper_api_url,
            search_results: parsed(var("SEARCH_RESULTS")).unwrap_or(self.search_results),
            search_timeout_secs: parsed(var("SEARCH_TIMEOUT_SECS")).unwrap_or(self.search_timeout_secs),
        }
    }
}

impl ConfigFile {
    /// 读取配置文件，文件不存在时返回 `None`
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::FileRead {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Self::parse(&content, path).map(Some)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::FileParse {
            path: path.display().to_string(),
            source,
        })
    }
}

fn parsed<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
