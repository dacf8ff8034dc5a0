//! Analytics service
//!
//! 单条链接的点击统计，分组计数在数据库中完成。

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::analytics::{ClickRecorder, LinkAnalytics, assemble_report};
use crate::errors::{LinklyticsError, Result};
use crate::storage::backend::{parse_browser, parse_device};
use crate::storage::{Link, SeaOrmStorage, TimeRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
}

/// 解析 RFC3339 时间或 YYYY-MM-DD 日期
///
/// 纯日期作为起点取当天 00:00:00，作为终点取当天最后一刻（UTC）
fn parse_bound(raw: &str, bound: Bound) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        LinklyticsError::validation(format!(
            "Invalid date '{}': expected RFC3339 or YYYY-MM-DD",
            raw
        ))
    })?;

    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            .ok_or_else(|| LinklyticsError::internal("invalid end-of-day time"))?,
    };
    Ok(date.and_time(time).and_utc())
}

/// 空字符串等同于未提供
pub fn parse_time_range(start: Option<&str>, end: Option<&str>) -> Result<TimeRange> {
    let start = start
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_bound(s, Bound::Start))
        .transpose()?;
    let end = end
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_bound(s, Bound::End))
        .transpose()?;

    if let (Some(s), Some(e)) = (start, end)
        && s > e
    {
        return Err(LinklyticsError::validation("start must not be after end"));
    }

    Ok(TimeRange { start, end })
}

pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
    recorder: Option<Arc<ClickRecorder>>,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>, recorder: Option<Arc<ClickRecorder>>) -> Self {
        Self { storage, recorder }
    }

    pub async fn get_link_analytics(&self, link: &Link, range: &TimeRange) -> Result<LinkAnalytics> {
        // 先落盘缓冲中的点击，保证统计与已发生的访问一致
        if let Some(recorder) = &self.recorder {
            recorder.flush().await;
        }

        let breakdown = self.storage.click_breakdown(&link.id, range).await?;

        Ok(assemble_report(
            breakdown
                .daily
                .into_iter()
                .map(|row| (row.label, row.count.max(0) as u64)),
            breakdown
                .devices
                .into_iter()
                .map(|row| (parse_device(&row.label), row.count.max(0) as u64)),
            breakdown
                .browsers
                .into_iter()
                .map(|row| (parse_browser(&row.label), row.count.max(0) as u64)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_time_range_dates() {
        let range = parse_time_range(Some("2026-03-01"), Some("2026-03-02")).unwrap();
        let start = range.start.unwrap();
        let end = range.end.unwrap();
        assert_eq!((start.day(), start.hour()), (1, 0));
        assert_eq!((end.day(), end.hour(), end.minute()), (2, 23, 59));
    }

    #[test]
    fn test_parse_time_range_rfc3339_and_open_bounds() {
        let range = parse_time_range(Some("2026-03-01T08:00:00+08:00"), None).unwrap();
        assert_eq!(range.start.unwrap().hour(), 0);
        assert!(range.end.is_none());

        let range = parse_time_range(Some(""), Some("  ")).unwrap();
        assert_eq!(range, TimeRange::unbounded());
    }

    #[test]
    fn test_parse_time_range_rejects_bad_input() {
        assert!(matches!(
            parse_time_range(Some("yesterday"), None),
            Err(LinklyticsError::Validation(_))
        ));
        assert!(matches!(
            parse_time_range(Some("2026-03-05"), Some("2026-03-01")),
            Err(LinklyticsError::Validation(_))
        ));
        // 同一天作为起止是合法的
        assert!(parse_time_range(Some("2026-03-01"), Some("2026-03-01")).is_ok());
    }
}
