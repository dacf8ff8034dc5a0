use sea_orm::ActiveValue::{NotSet, Set};

use crate::analytics::{BrowserCategory, DeviceCategory};
use crate::storage::{ClickEvent, Link, User};
use migration::entities::{click_event, link, user};

pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        short_code: model.short_code,
        original_url: model.original_url,
        owner_id: model.owner_id,
        created_at: model.created_at,
        expires_at: model.expires_at,
    }
}

pub fn link_to_active_model(link: &Link) -> link::ActiveModel {
    link::ActiveModel {
        id: Set(link.id.clone()),
        short_code: Set(link.short_code.clone()),
        original_url: Set(link.original_url.clone()),
        owner_id: Set(link.owner_id.clone()),
        created_at: Set(link.created_at),
        expires_at: Set(link.expires_at),
    }
}

pub fn model_to_user(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

pub fn user_to_active_model(user: &User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(user.id.clone()),
        email: Set(user.email.clone()),
        password_hash: Set(user.password_hash.clone()),
        created_at: Set(user.created_at),
    }
}

/// id 由数据库自增
pub fn click_event_to_active_model(event: &ClickEvent) -> click_event::ActiveModel {
    click_event::ActiveModel {
        id: NotSet,
        link_id: Set(event.link_id.clone()),
        clicked_at: Set(event.clicked_at),
        device: Set(event.device.as_ref().to_string()),
        browser: Set(event.browser.as_ref().to_string()),
        ip_hash: Set(event.ip_hash.clone()),
    }
}

/// 未知取值归入 other
pub fn parse_device(raw: &str) -> DeviceCategory {
    raw.parse().unwrap_or(DeviceCategory::Other)
}

pub fn parse_browser(raw: &str) -> BrowserCategory {
    raw.parse().unwrap_or(BrowserCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_link_model_conversion() {
        let now = Utc::now();
        let model = link::Model {
            id: "l1".to_string(),
            short_code: "demo1".to_string(),
            original_url: "https://example.com".to_string(),
            owner_id: "u1".to_string(),
            created_at: now,
            expires_at: Some(now + Duration::days(1)),
        };

        let link = model_to_link(model);
        assert_eq!(link.short_code, "demo1");
        assert_eq!(link.owner_id, "u1");
        assert!(!link.is_expired_at(now));

        let active = link_to_active_model(&link);
        assert_eq!(active.short_code, Set("demo1".to_string()));
    }

    #[test]
    fn test_click_event_active_model_uses_lowercase_categories() {
        let event = ClickEvent {
            link_id: "l1".to_string(),
            clicked_at: Utc::now(),
            device: DeviceCategory::Mobile,
            browser: BrowserCategory::Safari,
            ip_hash: None,
        };
        let active = click_event_to_active_model(&event);
        assert_eq!(active.device, Set("mobile".to_string()));
        assert_eq!(active.browser, Set("safari".to_string()));
        assert_eq!(active.id, NotSet);
    }

    #[test]
    fn test_parse_unknown_categories() {
        assert_eq!(parse_device("desktop"), DeviceCategory::Desktop);
        assert_eq!(parse_device("smart-fridge"), DeviceCategory::Other);
        assert_eq!(parse_browser("edge"), BrowserCategory::Edge);
        assert_eq!(parse_browser(""), BrowserCategory::Other);
    }
}
