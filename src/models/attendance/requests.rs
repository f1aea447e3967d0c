use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::AttendanceStatus;
use crate::models::common::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceEntryInput {
    pub student_id: i64,
    #[serde(default = "default_status")]
    pub status: AttendanceStatus,
    #[serde(default)]
    pub remarks: String,
}

fn default_status() -> AttendanceStatus {
    AttendanceStatus::Present
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct CreateAttendanceRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub entries: Vec<AttendanceEntryInput>,
}

/// entries 中的学员按 (记录, 学员) 更新或新增
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct UpdateAttendanceRequest {
    pub remarks: Option<String>,
    pub entries: Option<Vec<AttendanceEntryInput>>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct AttendanceListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub date: Option<NaiveDate>,
}

/// 同一学员在一次提交里出现多次时返回其 id
pub fn find_duplicate_student(entries: &[AttendanceEntryInput]) -> Option<i64> {
    let mut seen = std::collections::HashSet::new();
    entries
        .iter()
        .find(|e| !seen.insert(e.student_id))
        .map(|e| e.student_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(student_id: i64) -> AttendanceEntryInput {
        AttendanceEntryInput {
            student_id,
            status: AttendanceStatus::Present,
            remarks: String::new(),
        }
    }

    #[test]
    fn test_find_duplicate_student() {
        assert_eq!(find_duplicate_student(&[entry(1), entry(2)]), None);
        assert_eq!(find_duplicate_student(&[entry(1), entry(2), entry(1)]), Some(1));
    }

    #[test]
    fn test_entry_defaults_to_present() {
        let e: AttendanceEntryInput = serde_json::from_str(r#"{"student_id":4}"#).unwrap();
        assert_eq!(e.status, AttendanceStatus::Present);
    }
}
