//! API 帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::errors::LinklyticsError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// 构建错误响应 `{code, message}`
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::<()> {
        code: error_code as i32,
        message: message.to_string(),
        data: None,
    })
}

/// 从 LinklyticsError 构建错误响应，基础设施错误不向客户端暴露细节
pub fn error_from_linklytics(err: &LinklyticsError) -> HttpResponse {
    let status = err.http_status();
    let code = ErrorCode::from(err);

    if err.is_internal() {
        error!("Request failed: {}", err);
        return error_response(status, code, INTERNAL_ERROR_MESSAGE);
    }
    error_response(status, code, err.message())
}

pub fn ok_response<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(data)
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(data)
}
