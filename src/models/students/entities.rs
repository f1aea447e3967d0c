use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::User;

// 学员档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct Student {
    pub id: i64,
    pub user_id: i64,
    pub reg_no: Option<String>,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub admission_date: NaiveDate,
    pub address: String,
    pub photo: Option<String>,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 学员档案及其登录账号
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentDetail {
    pub student: Student,
    pub user: User,
}

impl StudentDetail {
    pub fn display_name(&self) -> String {
        self.user.full_name()
    }
}

/// 生成学号：`STU{入学年份}-{id:04}`
pub fn format_reg_no(admission_date: NaiveDate, id: i64) -> String {
    format!("STU{}-{:04}", admission_date.year(), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reg_no() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(format_reg_no(date, 7), "STU2025-0007");
        assert_eq!(format_reg_no(date, 12345), "STU2025-12345");
    }
}
