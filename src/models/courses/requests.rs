use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::DEFAULT_REQUIRED_ATTENDANCE_DAYS;
use crate::models::common::PaginationQuery;
use crate::models::common::query::{deserialize_optional_bool, deserialize_optional_i64};

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CreateCourseRequest {
    pub code: String,
    pub title: String,
    pub duration_weeks: i32,
    pub total_fees: f64,
    #[serde(default)]
    pub syllabus: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_required_days")]
    pub required_attendance_days: i32,
}

fn default_true() -> bool {
    true
}

fn default_required_days() -> i32 {
    DEFAULT_REQUIRED_ATTENDANCE_DAYS
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub title: Option<String>,
    pub duration_weeks: Option<i32>,
    pub total_fees: Option<f64>,
    pub syllabus: Option<String>,
    pub active: Option<bool>,
    pub required_attendance_days: Option<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CreateTrainerRequest {
    pub user_id: i64,
    pub emp_no: String,
    pub join_date: Option<NaiveDate>,
    pub salary: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct UpdateTrainerRequest {
    pub emp_no: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct TrainerListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CreateBatchRequest {
    pub course_id: i64,
    pub trainer_id: Option<i64>,
    pub code: String,
    pub capacity: i32,
    #[serde(default)]
    pub schedule: String,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct UpdateBatchRequest {
    pub trainer_id: Option<i64>,
    pub code: Option<String>,
    pub capacity: Option<i32>,
    pub schedule: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct BatchListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TrainerListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub course_id: Option<i64>,
    pub search: Option<String>,
}
