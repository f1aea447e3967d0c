use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 报名状态：active → completed | dropped
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "enrollment.ts")]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Active => write!(f, "active"),
            EnrollmentStatus::Completed => write!(f, "completed"),
            EnrollmentStatus::Dropped => write!(f, "dropped"),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EnrollmentStatus::Active),
            "completed" => Ok(EnrollmentStatus::Completed),
            "dropped" => Ok(EnrollmentStatus::Dropped),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub batch_id: Option<i64>,
    pub enrolled_on: NaiveDate,
    pub completion_date: Option<NaiveDate>,
    pub status: EnrollmentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Enrollment {
    /// 出勤达标时是否应自动结业
    pub fn should_complete(&self, present_days: i64, required_days: i32) -> bool {
        should_complete(self.status, present_days, required_days)
    }
}

/// 只有 active 的报名会自动转为 completed
pub fn should_complete(status: EnrollmentStatus, present_days: i64, required_days: i32) -> bool {
    status == EnrollmentStatus::Active && present_days >= i64::from(required_days)
}

/// 报名及其展示信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollmentDetail {
    pub enrollment: Enrollment,
    pub student_name: String,
    pub reg_no: Option<String>,
    pub course_code: String,
    pub course_title: String,
    pub batch_code: Option<String>,
    pub present_days: i64,
    pub required_days: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_threshold() {
        assert!(!should_complete(EnrollmentStatus::Active, 35, 36));
        assert!(should_complete(EnrollmentStatus::Active, 36, 36));
        assert!(should_complete(EnrollmentStatus::Active, 40, 36));
    }

    #[test]
    fn test_only_active_enrollments_complete() {
        assert!(!should_complete(EnrollmentStatus::Dropped, 50, 36));
        assert!(!should_complete(EnrollmentStatus::Completed, 50, 36));
    }

    #[test]
    fn test_zero_requirement_completes_immediately() {
        assert!(should_complete(EnrollmentStatus::Active, 0, 0));
    }

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!("dropped".parse(), Ok(EnrollmentStatus::Dropped));
        assert_eq!(EnrollmentStatus::Completed.to_string(), "completed");
        assert!("finished".parse::<EnrollmentStatus>().is_err());
    }
}
