//! 统计结果组装
//!
//! 数据库返回的是分组计数，这里负责合并、剔除零值并排序。

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use super::{BrowserCategory, DeviceCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCount {
    /// UTC 日期 YYYY-MM-DD
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceCount {
    pub device: DeviceCategory,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserCount {
    pub browser: BrowserCategory,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalytics {
    pub clicks_by_date: Vec<DateCount>,
    pub devices: Vec<DeviceCount>,
    pub browsers: Vec<BrowserCount>,
    pub total_clicks: u64,
}

/// 组装统计报告
///
/// - 日期升序，同一日期合并
/// - 设备/浏览器按次数降序，次数相同按名称
/// - 计数为 0 的分组不输出
/// - total_clicks 等于按日计数之和
pub fn assemble_report(
    daily: impl IntoIterator<Item = (String, u64)>,
    devices: impl IntoIterator<Item = (DeviceCategory, u64)>,
    browsers: impl IntoIterator<Item = (BrowserCategory, u64)>,
) -> LinkAnalytics {
    let mut by_date: BTreeMap<String, u64> = BTreeMap::new();
    for (date, count) in daily {
        if count > 0 {
            *by_date.entry(date).or_insert(0) += count;
        }
    }

    let clicks_by_date: Vec<DateCount> = by_date
        .into_iter()
        .map(|(date, count)| DateCount { date, count })
        .collect();
    let total_clicks = clicks_by_date.iter().map(|d| d.count).sum();

    let devices = merge_ranked(devices)
        .into_iter()
        .map(|(device, count)| DeviceCount { device, count })
        .collect();
    let browsers = merge_ranked(browsers)
        .into_iter()
        .map(|(browser, count)| BrowserCount { browser, count })
        .collect();

    LinkAnalytics {
        clicks_by_date,
        devices,
        browsers,
        total_clicks,
    }
}

fn merge_ranked<K>(rows: impl IntoIterator<Item = (K, u64)>) -> Vec<(K, u64)>
where
    K: Eq + Hash + AsRef<str> + Copy,
{
    let mut merged: HashMap<K, u64> = HashMap::new();
    for (key, count) in rows {
        if count > 0 {
            *merged.entry(key).or_insert(0) += count;
        }
    }

    let mut ranked: Vec<(K, u64)> = merged.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_ref().cmp(b.0.as_ref())));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates_sorted_and_total_matches() {
        let report = assemble_report(
            vec![
                ("2026-03-02".to_string(), 4),
                ("2026-03-01".to_string(), 2),
                ("2026-03-03".to_string(), 0),
            ],
            vec![(DeviceCategory::Desktop, 6)],
            vec![(BrowserCategory::Chrome, 6)],
        );

        assert_eq!(
            report.clicks_by_date,
            vec![
                DateCount {
                    date: "2026-03-01".into(),
                    count: 2
                },
                DateCount {
                    date: "2026-03-02".into(),
                    count: 4
                },
            ]
        );
        assert_eq!(report.total_clicks, 6);
    }

    #[test]
    fn test_categories_merged_ranked_and_zero_dropped() {
        let report = assemble_report(
            Vec::new(),
            vec![
                (DeviceCategory::Other, 1),
                (DeviceCategory::Mobile, 3),
                (DeviceCategory::Other, 2),
                (DeviceCategory::Tablet, 0),
            ],
            vec![(BrowserCategory::Safari, 2), (BrowserCategory::Firefox, 2)],
        );

        let devices: Vec<_> = report.devices.iter().map(|d| (d.device, d.count)).collect();
        assert_eq!(
            devices,
            vec![(DeviceCategory::Mobile, 3), (DeviceCategory::Other, 3)]
        );

        let browsers: Vec<_> = report.browsers.iter().map(|b| b.browser).collect();
        assert_eq!(browsers, vec![BrowserCategory::Firefox, BrowserCategory::Safari]);
    }

    #[test]
    fn test_empty_report_serializes_camel_case() {
        let report = assemble_report(Vec::new(), Vec::new(), Vec::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totalClicks"], 0);
        assert!(json["clicksByDate"].as_array().unwrap().is_empty());
        assert!(json["devices"].as_array().unwrap().is_empty());
    }
}
