//! 数据模型
//!
//! 每个业务域分为 entities（业务实体）、requests（请求体/查询参数）、responses（响应体）。

pub mod attendance;
pub mod auth;
pub mod certificates;
pub mod common;
pub mod courses;
pub mod enrollments;
pub mod events;
pub mod finance;
pub mod messaging;
pub mod notifications;
pub mod students;
pub mod system;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，写入响应体的 `code` 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    PasswordPolicyViolation = 2001,
    OldPasswordIncorrect = 2002,
    PasswordResetInvalid = 2003,
    MailSendFailed = 2004,

    // 用户与学员
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserRoleInvalid = 3004,
    StudentNotFound = 3100,
    StudentProfileRequired = 3101,
    StudentInvalid = 3102,
    FileUploadFailed = 3103,
    FileTypeNotAllowed = 3104,
    FileSizeExceeded = 3105,

    // 课程、批次、讲师、报名
    CourseNotFound = 4000,
    CourseInvalid = 4001,
    BatchNotFound = 4100,
    BatchInvalid = 4101,
    BatchCapacityReached = 4102,
    TrainerNotFound = 4200,
    TrainerInvalid = 4201,
    EnrollmentNotFound = 4300,
    EnrollmentDuplicate = 4301,

    // 考勤与证书
    AttendanceNotFound = 5000,
    AttendanceInvalid = 5001,
    CertificateNotFound = 5100,
    CertificateAlreadyIssued = 5101,
    CertificateNotEligible = 5102,
    DocumentUnavailable = 5103,

    // 财务
    ReceiptNotFound = 6000,
    ReceiptLocked = 6001,
    ReceiptInvalid = 6002,
    ExpenseNotFound = 6100,
    ExpenseInvalid = 6101,
    PayrollNotFound = 6200,
    PayrollInvalid = 6201,

    // 消息、通知、活动
    ConversationNotFound = 7000,
    MessageInvalid = 7001,
    NotificationNotFound = 7100,
    NotificationInvalid = 7101,
    EventNotFound = 7200,
    EventInvalid = 7201,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::BatchCapacityReached as i32, 4102);
        assert_eq!(ErrorCode::ReceiptLocked as i32, 6001);
    }
}
