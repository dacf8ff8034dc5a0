use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum LinklyticsError {
    Validation(String),
    AliasTaken(String),
    UserExists(String),
    Auth(String),
    NotFound(String),
    LinkExpired(String),
    GenerationExhausted(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Serialization(String),
    Internal(String),
}

impl LinklyticsError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinklyticsError::Validation(_) => "E001",
            LinklyticsError::AliasTaken(_) => "E002",
            LinklyticsError::UserExists(_) => "E003",
            LinklyticsError::Auth(_) => "E004",
            LinklyticsError::NotFound(_) => "E005",
            LinklyticsError::LinkExpired(_) => "E006",
            LinklyticsError::GenerationExhausted(_) => "E007",
            LinklyticsError::DatabaseConfig(_) => "E008",
            LinklyticsError::DatabaseConnection(_) => "E009",
            LinklyticsError::DatabaseOperation(_) => "E010",
            LinklyticsError::FileOperation(_) => "E011",
            LinklyticsError::Serialization(_) => "E012",
            LinklyticsError::Internal(_) => "E013",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinklyticsError::Validation(_) => "Validation Error",
            LinklyticsError::AliasTaken(_) => "Alias Taken",
            LinklyticsError::UserExists(_) => "User Already Exists",
            LinklyticsError::Auth(_) => "Authentication Error",
            LinklyticsError::NotFound(_) => "Resource Not Found",
            LinklyticsError::LinkExpired(_) => "Link Expired",
            LinklyticsError::GenerationExhausted(_) => "Code Generation Exhausted",
            LinklyticsError::DatabaseConfig(_) => "Database Configuration Error",
            LinklyticsError::DatabaseConnection(_) => "Database Connection Error",
            LinklyticsError::DatabaseOperation(_) => "Database Operation Error",
            LinklyticsError::FileOperation(_) => "File Operation Error",
            LinklyticsError::Serialization(_) => "Serialization Error",
            LinklyticsError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinklyticsError::Validation(msg)
            | LinklyticsError::AliasTaken(msg)
            | LinklyticsError::UserExists(msg)
            | LinklyticsError::Auth(msg)
            | LinklyticsError::NotFound(msg)
            | LinklyticsError::LinkExpired(msg)
            | LinklyticsError::GenerationExhausted(msg)
            | LinklyticsError::DatabaseConfig(msg)
            | LinklyticsError::DatabaseConnection(msg)
            | LinklyticsError::DatabaseOperation(msg)
            | LinklyticsError::FileOperation(msg)
            | LinklyticsError::Serialization(msg)
            | LinklyticsError::Internal(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinklyticsError::Validation(_) => StatusCode::BAD_REQUEST,
            LinklyticsError::AliasTaken(_) | LinklyticsError::UserExists(_) => {
                StatusCode::CONFLICT
            }
            LinklyticsError::Auth(_) => StatusCode::UNAUTHORIZED,
            LinklyticsError::NotFound(_) => StatusCode::NOT_FOUND,
            LinklyticsError::LinkExpired(_) => StatusCode::GONE,
            LinklyticsError::GenerationExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            LinklyticsError::DatabaseConfig(_)
            | LinklyticsError::DatabaseConnection(_)
            | LinklyticsError::DatabaseOperation(_)
            | LinklyticsError::FileOperation(_)
            | LinklyticsError::Serialization(_)
            | LinklyticsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否是基础设施错误（对外只返回通用消息）
    pub fn is_internal(&self) -> bool {
        self.http_status() == StatusCode::INTERNAL_SERVER_ERROR
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinklyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinklyticsError {}

// 便捷的构造函数
impl LinklyticsError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::Validation(msg.into())
    }

    pub fn alias_taken<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::AliasTaken(msg.into())
    }

    pub fn user_exists<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::UserExists(msg.into())
    }

    pub fn auth<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::Auth(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::NotFound(msg.into())
    }

    pub fn link_expired<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::LinkExpired(msg.into())
    }

    pub fn generation_exhausted<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::GenerationExhausted(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::Serialization(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        LinklyticsError::Internal(msg.into())
    }
}

impl From<sea_orm::DbErr> for LinklyticsError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinklyticsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinklyticsError {
    fn from(err: std::io::Error) -> Self {
        LinklyticsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinklyticsError {
    fn from(err: serde_json::Error) -> Self {
        LinklyticsError::Serialization(err.to_string())
    }
}

impl From<crate::utils::password::PasswordError> for LinklyticsError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        LinklyticsError::Internal(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for LinklyticsError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        LinklyticsError::Internal(format!("Token error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, LinklyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            LinklyticsError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LinklyticsError::alias_taken("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            LinklyticsError::auth("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            LinklyticsError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            LinklyticsError::link_expired("x").http_status(),
            StatusCode::GONE
        );
        assert_eq!(
            LinklyticsError::generation_exhausted("x").http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            LinklyticsError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_db_err_conversion() {
        let err: LinklyticsError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, LinklyticsError::DatabaseOperation(_)));
        assert!(err.is_internal());
        assert!(err.message().contains("boom"));
    }

    #[test]
    fn test_format_simple() {
        let err = LinklyticsError::alias_taken("Alias 'demo1' is already in use");
        assert_eq!(
            err.format_simple(),
            "Alias Taken: Alias 'demo1' is already in use"
        );
        assert_eq!(err.to_string(), err.format_simple());
        assert_eq!(err.code(), "E002");
    }
}
