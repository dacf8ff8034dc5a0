//! API 请求/响应类型
//!
//! 成功响应直接返回资源本身（Dashboard 直接读取字段），错误统一为 ApiResponse。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::analytics::LinkAnalytics;
use crate::storage::{Link, User};

/// 错误响应体 `{code, message}`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct UserView {
    pub id: String,
    pub email: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserView,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkBody {
    pub original_url: String,
    #[serde(default)]
    pub custom_alias: Option<String>,
    /// 数字、数字字符串或空字符串（不过期）
    #[serde(default, deserialize_with = "deserialize_expiration_days")]
    pub expiration_days: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlexibleDays {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_expiration_days<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<FlexibleDays>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FlexibleDays::Int(days)) => Ok(Some(days)),
        Some(FlexibleDays::Float(days)) if days.fract() == 0.0 && days.is_finite() => {
            Ok(Some(days as i64))
        }
        Some(FlexibleDays::Float(_)) => {
            Err(D::Error::custom("expirationDays must be a whole number"))
        }
        Some(FlexibleDays::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>()
                .map(Some)
                .map_err(|_| D::Error::custom("expirationDays must be a whole number"))
        }
    }
}

/// 返回给客户端的链接
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LinkView {
    pub id: String,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub total_clicks: u64,
    pub is_expired: bool,
}

impl LinkView {
    pub fn new(link: Link, total_clicks: u64, public_base_url: &str, now: DateTime<Utc>) -> Self {
        Self {
            short_url: format!("{}/{}", public_base_url.trim_end_matches('/'), link.short_code),
            is_expired: link.is_expired_at(now),
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            owner_id: link.owner_id,
            created_at: link.created_at,
            expires_at: link.expires_at,
            total_clicks,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct AnalyticsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct AnalyticsResponse {
    pub link: LinkView,
    pub analytics: LinkAnalytics,
}

#[derive(Serialize, Clone, Debug)]
pub struct HealthStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}
