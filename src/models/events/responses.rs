use serde::Serialize;
use ts_rs::TS;

use super::entities::Event;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "event.ts")]
pub struct EventListResponse {
    pub items: Vec<Event>,
    pub pagination: PaginationInfo,
}
