use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::enrollments::entities::EnrollmentStatus;

// 出勤状态，存储为单个字母
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export, export_to = "attendance.ts")]
pub enum AttendanceStatus {
    #[serde(rename = "P")]
    Present,
    #[serde(rename = "A")]
    Absent,
    #[serde(rename = "L")]
    Late,
    #[serde(rename = "E")]
    Excused,
}

impl AttendanceStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "P",
            AttendanceStatus::Absent => "A",
            AttendanceStatus::Late => "L",
            AttendanceStatus::Excused => "E",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" => Ok(AttendanceStatus::Present),
            "A" => Ok(AttendanceStatus::Absent),
            "L" => Ok(AttendanceStatus::Late),
            "E" => Ok(AttendanceStatus::Excused),
            _ => Err(format!("Invalid attendance status: {s}")),
        }
    }
}

// 某一天的考勤记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub taken_by: Option<i64>,
    pub remarks: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceEntry {
    pub id: i64,
    pub record_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceSummary {
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
}

impl AttendanceSummary {
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a AttendanceStatus>) -> Self {
        let mut summary = Self::default();
        for status in statuses {
            match status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::Late => summary.late += 1,
                AttendanceStatus::Excused => summary.excused += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> i64 {
        self.present + self.absent + self.late + self.excused
    }

    /// 出勤率（百分比，两位小数），无记录时为 0
    pub fn percentage(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.present as f64 / total as f64 * 10000.0).round() / 100.0
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceEntryDetail {
    pub entry: AttendanceEntry,
    pub student_name: String,
    pub reg_no: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceRecordDetail {
    pub record: AttendanceRecord,
    pub taken_by_name: Option<String>,
    pub entries: Vec<AttendanceEntryDetail>,
    pub summary: AttendanceSummary,
    pub total_students: i64,
}

/// 学员自己的出勤历史
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct MyAttendanceItem {
    pub record_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub remarks: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct EnrollmentProgress {
    pub enrollment_id: i64,
    pub course_id: i64,
    pub course_title: String,
    pub status: EnrollmentStatus,
    pub present_days: i64,
    pub required_days: i32,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct StudentAttendanceAnalytics {
    pub student_id: i64,
    pub student_name: String,
    pub reg_no: Option<String>,
    pub summary: AttendanceSummary,
    pub total_days: i64,
    pub attendance_percentage: f64,
    pub enrollments: Vec<EnrollmentProgress>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttendanceStatus::*;

    #[test]
    fn test_summary_counts() {
        let statuses = [Present, Present, Absent, Late, Excused, Present];
        let summary = AttendanceSummary::from_statuses(statuses.iter());
        assert_eq!(
            summary,
            AttendanceSummary {
                present: 3,
                absent: 1,
                late: 1,
                excused: 1
            }
        );
        assert_eq!(summary.total(), 6);
        assert_eq!(summary.percentage(), 50.0);
    }

    #[test]
    fn test_percentage_rounding_and_empty() {
        let summary = AttendanceSummary::from_statuses([Present, Absent, Absent].iter());
        assert_eq!(summary.percentage(), 33.33);
        assert_eq!(AttendanceSummary::default().percentage(), 0.0);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(serde_json::to_string(&Present).unwrap(), "\"P\"");
        assert_eq!("E".parse::<AttendanceStatus>(), Ok(Excused));
        assert!("X".parse::<AttendanceStatus>().is_err());
    }
}
