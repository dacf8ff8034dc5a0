//! 存储层领域模型

use chrono::{DateTime, Utc};

use crate::analytics::{BrowserCategory, DeviceCategory};

/// 短链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: String,
    pub short_code: String,
    pub original_url: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Link {
    /// 严格晚于 expires_at 才视为过期
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// 带派生点击数的链接（列表查询）
#[derive(Debug, Clone)]
pub struct LinkWithClicks {
    pub link: Link,
    pub total_clicks: u64,
}

/// Dashboard 用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// 单次点击事件（只追加）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: String,
    pub clicked_at: DateTime<Utc>,
    pub device: DeviceCategory,
    pub browser: BrowserCategory,
    pub ip_hash: Option<String>,
}

/// 查询时间范围，两端均为闭区间，None 表示不限
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| ts >= s) && self.end.is_none_or(|e| ts <= e)
    }
}
