use serde::Serialize;
use ts_rs::TS;

use super::entities::{BatchDetail, Course, TrainerDetail};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct TrainerListResponse {
    pub items: Vec<TrainerDetail>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct BatchListResponse {
    pub items: Vec<BatchDetail>,
    pub pagination: PaginationInfo,
}
