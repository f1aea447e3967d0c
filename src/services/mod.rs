pub mod attendance;
pub mod auth;
pub mod batches;
pub mod certificates;
pub mod courses;
pub mod documents;
pub mod enrollments;
pub mod events;
pub mod finance;
pub mod messaging;
pub mod notifications;
pub mod students;
pub mod system;
pub mod trainers;
pub mod users;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use batches::BatchService;
pub use certificates::CertificateService;
pub use courses::CourseService;
pub use enrollments::EnrollmentService;
pub use events::EventService;
pub use finance::FinanceService;
pub use messaging::MessagingService;
pub use notifications::NotificationService;
pub use students::StudentService;
pub use system::SystemService;
pub use trainers::TrainerService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::error;

use crate::errors::InstituteError;
use crate::middlewares::RequireJWT;
use crate::models::students::entities::Student;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub(crate) fn storage_from_request(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

/// 存储层错误转 HTTP 响应
///
/// 校验、不存在、冲突使用调用方给出的业务码，其余统一 500 并记录日志。
pub(crate) fn storage_error_response(err: InstituteError, code: ErrorCode) -> HttpResponse {
    match err {
        InstituteError::Validation(msg) => {
            HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg))
        }
        InstituteError::NotFound(msg) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(code, msg))
        }
        InstituteError::Conflict(msg) => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(code, msg))
        }
        InstituteError::Authentication(msg) => {
            HttpResponse::Unauthorized().json(ApiResponse::error_empty(ErrorCode::Unauthorized, msg))
        }
        InstituteError::Authorization(msg) => {
            HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, msg))
        }
        other => {
            error!("{}", other);
            internal_error()
        }
    }
}

pub(crate) fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        "Internal server error.",
    ))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Authentication credentials were not provided.",
    ))
}

pub(crate) fn forbidden() -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::Forbidden,
        "You do not have permission to perform this action.",
    ))
}

/// 调用方身份：职员或持有学员档案的学员
pub(crate) enum Caller {
    Staff(User),
    Student(User, Student),
    /// 学员角色但尚未建档
    Other(User),
}

impl Caller {
    pub fn user(&self) -> &User {
        match self {
            Caller::Staff(user) | Caller::Student(user, _) | Caller::Other(user) => user,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Caller::Staff(_))
    }

    pub fn student_id(&self) -> Option<i64> {
        match self {
            Caller::Student(_, student) => Some(student.id),
            _ => None,
        }
    }

    /// 职员或该学员本人
    pub fn can_access_student(&self, student_id: i64) -> bool {
        self.is_staff() || self.student_id() == Some(student_id)
    }
}

/// 解析当前请求的调用方，未登录或存储出错时直接给出响应
pub(crate) async fn resolve_caller(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
) -> Result<Caller, HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Err(unauthorized());
    };

    if user.is_staff() {
        return Ok(Caller::Staff(user));
    }

    match storage.get_student_by_user_id(user.id).await {
        Ok(Some(student)) => Ok(Caller::Student(user, student)),
        Ok(None) => Ok(Caller::Other(user)),
        Err(e) => Err(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

/// 要求调用方为持有档案的学员
pub(crate) async fn require_student(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
) -> Result<(User, Student), HttpResponse> {
    match resolve_caller(storage, request).await? {
        Caller::Student(user, student) => Ok((user, student)),
        _ => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::StudentProfileRequired,
            "Student profile not found for this user.",
        ))),
    }
}

/// 生成服务结构体、懒加载构造与存储获取
macro_rules! lazy_service {
    ($name:ident) => {
        pub struct $name {
            storage: Option<std::sync::Arc<dyn crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> std::sync::Arc<dyn crate::storage::Storage> {
                match &self.storage {
                    Some(storage) => storage.clone(),
                    None => crate::services::storage_from_request(request),
                }
            }
        }
    };
}

pub(crate) use lazy_service;
