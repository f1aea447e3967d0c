use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_optional_bool;

/// 新学员的登录账号，角色固定为 student
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentUserPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct CreateStudentRequest {
    pub user: Option<StudentUserPayload>,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub admission_date: Option<NaiveDate>,
    #[serde(default)]
    pub address: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// 更新学员档案；请求体里的 user 字段被忽略
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct UpdateStudentRequest {
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub admission_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub active: Option<bool>,
    pub admission_date: Option<NaiveDate>,
    pub search: Option<String>,
}

// 存储层查询
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub active: Option<bool>,
    pub admission_date: Option<NaiveDate>,
    pub search: Option<String>,
    /// 仅返回该账号的档案（学员自己查看时）
    pub user_id: Option<i64>,
}
