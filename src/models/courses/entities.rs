use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::User;

/// 默认结业所需出勤天数
pub const DEFAULT_REQUIRED_ATTENDANCE_DAYS: i32 = 36;

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub title: String,
    pub duration_weeks: i32,
    pub total_fees: f64,
    pub syllabus: String,
    pub active: bool,
    pub required_attendance_days: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    /// 证书上的时长描述
    pub fn duration_text(&self) -> String {
        duration_text(self.duration_weeks)
    }
}

/// 12 周写作 3 个月，24 周写作 6 个月，其余按周
pub fn duration_text(weeks: i32) -> String {
    match weeks {
        12 => "3 Months".to_string(),
        24 => "6 Months".to_string(),
        1 => "1 Week".to_string(),
        n => format!("{n} Weeks"),
    }
}

// 讲师
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct Trainer {
    pub id: i64,
    pub user_id: i64,
    pub emp_no: String,
    pub join_date: NaiveDate,
    pub salary: f64,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct TrainerDetail {
    pub trainer: Trainer,
    pub user: User,
}

// 批次
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct Batch {
    pub id: i64,
    pub course_id: i64,
    pub trainer_id: Option<i64>,
    pub code: String,
    pub capacity: i32,
    pub schedule: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Batch {
    pub fn is_full(&self, enrolled: i64) -> bool {
        enrolled >= i64::from(self.capacity)
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct BatchDetail {
    pub batch: Batch,
    pub course_title: String,
    pub trainer_name: Option<String>,
    pub enrolled_count: i64,
    pub is_full: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_text() {
        assert_eq!(duration_text(12), "3 Months");
        assert_eq!(duration_text(24), "6 Months");
        assert_eq!(duration_text(8), "8 Weeks");
        assert_eq!(duration_text(1), "1 Week");
    }

    #[test]
    fn test_batch_is_full() {
        let batch = Batch {
            id: 1,
            course_id: 1,
            trainer_id: None,
            code: "WEB-01".into(),
            capacity: 2,
            schedule: String::new(),
            created_at: chrono::Utc::now(),
        };
        assert!(!batch.is_full(1));
        assert!(batch.is_full(2));
        assert!(batch.is_full(3));
    }
}
