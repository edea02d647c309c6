use thiserror::Error;

/// 应用程序错误类型
///
/// 每一层只产生自己那一类错误，统一在顶层汇总。
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入文件错误
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
    /// 模型生成错误（认证、网络、响应格式等都归为"生成失败"）
    #[error("生成失败: {0}")]
    Generation(#[from] GenerationError),
    /// 文档渲染 / 写入错误
    #[error("渲染失败: {0}")]
    Render(#[from] RenderError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 输入文件错误
#[derive(Debug, Error)]
pub enum InputError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    Missing { path: String },
    /// 文件没有任何内容
    #[error("文件内容为空: {path}")]
    Empty { path: String },
    /// 读取或解析失败
    #[error("读取文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 模型 / 搜索服务错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 缺少 API 凭证，在发出任何请求之前就失败
    #[error("缺少环境变量 {var}")]
    MissingCredentials { var: String },
    /// 认证失败
    #[error("{service} 认证失败: {message}")]
    Authentication { service: String, message: String },
    /// 请求频率限制或额度不足
    #[error("{service} 请求频率限制: {message}")]
    RateLimited { service: String, message: String },
    /// 网络请求失败
    #[error("{service} 网络请求失败: {source}")]
    Network {
        service: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空或无法解析
    #[error("{service} 返回内容无法使用: {reason}")]
    MalformedResponse { service: String, reason: String },
    /// 其他 API 错误
    #[error("{service} API 错误: {message}")]
    Api { service: String, message: String },
}

/// 文档渲染错误
#[derive(Debug, Error)]
pub enum RenderError {
    /// 生成 docx 内容失败
    #[error("生成文档失败: {0}")]
    Build(String),
    /// 写入磁盘失败
    #[error("写入文件失败 ({path}): {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("无法解析配置文件 {path}: {source}")]
    FileParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl GenerationError {
    pub fn missing_credentials(var: impl Into<String>) -> Self {
        GenerationError::MissingCredentials { var: var.into() }
    }

    pub fn malformed(service: impl Into<String>, reason: impl Into<String>) -> Self {
        GenerationError::MalformedResponse {
            service: service.into(),
            reason: reason.into(),
        }
    }

    pub fn network(
        service: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        GenerationError::Network {
            service: service.into(),
            source: Box::new(source),
        }
    }
}

impl InputError {
    pub fn read(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        InputError::Read {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_wraps_into_app_error() {
        let err: AppError = GenerationError::missing_credentials("OPENAI_API_KEY").into();
        let msg = err.to_string();
        assert!(msg.starts_with("生成失败"));
        assert!(msg.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_input_error_message_contains_path() {
        let err: AppError = InputError::Missing {
            path: "resume.txt".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "输入错误: 文件不存在: resume.txt");
    }

    #[test]
    fn test_read_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = InputError::read("resume.txt", io);
        assert!(std::error::Error::source(&err).is_some());
    }
}
