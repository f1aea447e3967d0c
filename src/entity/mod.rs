//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间戳以秒存储，日期以 `YYYY-MM-DD` 字符串存储。

pub mod prelude;

pub mod attendance_entries;
pub mod attendance_records;
pub mod batches;
pub mod certificates;
pub mod conversations;
pub mod courses;
pub mod enrollments;
pub mod events;
pub mod expenses;
pub mod fees_receipts;
pub mod messages;
pub mod notifications;
pub mod payrolls;
pub mod students;
pub mod trainers;
pub mod users;

use chrono::{DateTime, NaiveDate, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

pub(crate) fn parse_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_default()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
