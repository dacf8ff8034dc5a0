//! 目标 URL 校验
//!
//! 只允许带主机名的 http/https 绝对地址

use url::Url;

/// 目标 URL 最大长度
pub const MAX_URL_LENGTH: usize = 2048;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    TooLong(usize),
    DangerousProtocol(String),
    InvalidProtocol(String),
    MissingHost,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "originalUrl cannot be empty"),
            Self::TooLong(len) => write!(
                f,
                "originalUrl is too long ({} characters, maximum {})",
                len, MAX_URL_LENGTH
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "URL protocol is not allowed: {}", proto)
            }
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::MissingHost => write!(f, "URL must include a host"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

impl From<UrlValidationError> for crate::errors::LinklyticsError {
    fn from(err: UrlValidationError) -> Self {
        crate::errors::LinklyticsError::validation(err.to_string())
    }
}

const DANGEROUS_SCHEMES: &[&str] = &["javascript", "data", "file", "vbscript", "about", "blob"];

/// 校验并返回解析后的 URL
pub fn validate_url(raw: &str) -> Result<Url, UrlValidationError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }
    if raw.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong(raw.len()));
    }

    let parsed = Url::parse(raw).map_err(|e| {
        // 无法解析时仍按协议名识别危险协议
        let scheme = raw.split(':').next().unwrap_or_default().to_ascii_lowercase();
        if DANGEROUS_SCHEMES.contains(&scheme.as_str()) {
            UrlValidationError::DangerousProtocol(format!("{}:", scheme))
        } else {
            UrlValidationError::InvalidFormat(e.to_string())
        }
    })?;

    let scheme = parsed.scheme();
    if DANGEROUS_SCHEMES.contains(&scheme) {
        return Err(UrlValidationError::DangerousProtocol(format!("{}:", scheme)));
    }
    if scheme != "http" && scheme != "https" {
        return Err(UrlValidationError::InvalidProtocol(format!("{}:", scheme)));
    }
    if parsed.host_str().is_none_or(|h| h.is_empty()) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(parsed)
}
