use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "event.ts")]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Event {
    pub fn is_visible_on(&self, today: NaiveDate) -> bool {
        self.end_date >= today
    }
}

/// 结束日期缺省为开始日期，且不得早于开始日期
pub fn resolve_event_dates(
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate), String> {
    let end = end.unwrap_or(start);
    if end < start {
        return Err("End date cannot be before start date.".to_string());
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_resolve_event_dates() {
        assert_eq!(
            resolve_event_dates(d("2025-05-01"), None),
            Ok((d("2025-05-01"), d("2025-05-01")))
        );
        assert_eq!(
            resolve_event_dates(d("2025-05-01"), Some(d("2025-05-03"))),
            Ok((d("2025-05-01"), d("2025-05-03")))
        );
        assert!(resolve_event_dates(d("2025-05-03"), Some(d("2025-05-01"))).is_err());
    }
}
