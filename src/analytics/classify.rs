//! User-Agent 分类
//!
//! 把 UA 归入固定的设备/浏览器类别，未知一律为 other。

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use woothee::parser::Parser;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceCategory {
    Mobile,
    Desktop,
    Tablet,
    Other,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BrowserCategory {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Other,
}

/// 对 UA 进行分类，缺失或无法识别时返回 (Other, Other)
pub fn classify_user_agent(user_agent: Option<&str>) -> (DeviceCategory, BrowserCategory) {
    let Some(ua) = user_agent.map(str::trim).filter(|ua| !ua.is_empty()) else {
        return (DeviceCategory::Other, BrowserCategory::Other);
    };

    let parsed = Parser::new().parse(ua);
    let (category, name) = parsed
        .as_ref()
        .map(|r| (r.category, r.name))
        .unwrap_or(("UNKNOWN", "UNKNOWN"));

    (classify_device(ua, category), classify_browser(ua, name))
}

fn classify_device(ua: &str, category: &str) -> DeviceCategory {
    let lower = ua.to_ascii_lowercase();

    // woothee 把平板归入 smartphone
    if lower.contains("ipad")
        || lower.contains("tablet")
        || (lower.contains("android") && !lower.contains("mobile"))
    {
        return DeviceCategory::Tablet;
    }

    match category {
        "pc" => DeviceCategory::Desktop,
        "smartphone" | "mobilephone" => DeviceCategory::Mobile,
        _ => DeviceCategory::Other,
    }
}

fn classify_browser(ua: &str, name: &str) -> BrowserCategory {
    // Chromium Edge、Opera 与 iOS 上的外壳浏览器需要先按 token 识别
    if ["Edg/", "Edge/", "EdgA/", "EdgiOS/"]
        .iter()
        .any(|t| ua.contains(t))
    {
        return BrowserCategory::Edge;
    }
    if ua.contains("OPR/") || ua.contains("Opera") {
        return BrowserCategory::Other;
    }
    if ua.contains("CriOS/") {
        return BrowserCategory::Chrome;
    }
    if ua.contains("FxiOS/") {
        return BrowserCategory::Firefox;
    }

    match name {
        "Chrome" => BrowserCategory::Chrome,
        "Firefox" => BrowserCategory::Firefox,
        "Safari" => BrowserCategory::Safari,
        "Edge" => BrowserCategory::Edge,
        _ => BrowserCategory::Other,
    }
}
