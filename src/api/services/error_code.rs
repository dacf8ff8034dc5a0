//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::LinklyticsError;

/// API 错误码，序列化为数字
///
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证与用户
/// - 3000-3099: 链接
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,

    AuthFailed = 2000,
    UserAlreadyExists = 2005,

    LinkNotFound = 3000,
    LinkAliasTaken = 3001,
    LinkExpired = 3007,
    LinkCodeExhausted = 3008,
}

impl From<&LinklyticsError> for ErrorCode {
    fn from(err: &LinklyticsError) -> Self {
        match err {
            LinklyticsError::Validation(_) => ErrorCode::BadRequest,
            LinklyticsError::AliasTaken(_) => ErrorCode::LinkAliasTaken,
            LinklyticsError::UserExists(_) => ErrorCode::UserAlreadyExists,
            LinklyticsError::Auth(_) => ErrorCode::AuthFailed,
            LinklyticsError::NotFound(_) => ErrorCode::NotFound,
            LinklyticsError::LinkExpired(_) => ErrorCode::LinkExpired,
            LinklyticsError::GenerationExhausted(_) => ErrorCode::LinkCodeExhausted,
            LinklyticsError::DatabaseConfig(_)
            | LinklyticsError::DatabaseConnection(_)
            | LinklyticsError::DatabaseOperation(_)
            | LinklyticsError::FileOperation(_)
            | LinklyticsError::Serialization(_)
            | LinklyticsError::Internal(_) => ErrorCode::InternalServerError,
        }
    }
}
