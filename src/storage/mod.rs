use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::{
    attendance::{
        entities::{AttendanceRecordDetail, MyAttendanceItem, StudentAttendanceAnalytics},
        requests::{AttendanceListQuery, CreateAttendanceRequest, UpdateAttendanceRequest},
        responses::AttendanceListResponse,
    },
    certificates::{
        entities::{Certificate, CertificateDetail},
        requests::{CertificateListQuery, CreateCertificateRequest, UpdateCertificateRequest},
        responses::CertificateListResponse,
    },
    courses::{
        entities::{BatchDetail, Course, TrainerDetail},
        requests::{
            BatchListQuery, CourseListQuery, CreateBatchRequest, CreateCourseRequest,
            CreateTrainerRequest, TrainerListQuery, UpdateBatchRequest, UpdateCourseRequest,
            UpdateTrainerRequest,
        },
        responses::{BatchListResponse, CourseListResponse, TrainerListResponse},
    },
    enrollments::{
        entities::{Enrollment, EnrollmentDetail},
        requests::{CreateEnrollmentRequest, EnrollmentListQuery, UpdateEnrollmentRequest},
        responses::EnrollmentListResponse,
    },
    events::{
        entities::Event,
        requests::{CreateEventRequest, EventListQuery, UpdateEventRequest},
        responses::EventListResponse,
    },
    finance::{
        analytics::{CourseOutstanding, OverallOutstanding, StudentOutstanding},
        entities::{Expense, FeesReceipt, PayrollDetail, ReceiptDetail},
        requests::{
            CreateExpenseRequest, CreatePayrollRequest, CreateReceiptRequest, ExpenseListQuery,
            PayrollListQuery, ReceiptListQuery, UpdateExpenseRequest, UpdatePayrollRequest,
            UpdateReceiptRequest,
        },
        responses::{
            ExpenseListResponse, FinanceAnalyticsResponse, PayrollListResponse,
            ReceiptListResponse,
        },
    },
    messaging::{
        entities::{Conversation, Message, MessageDetail},
        requests::ConversationListQuery,
        responses::ConversationListResponse,
    },
    notifications::{
        entities::{NotificationLevel, NotificationTarget},
        requests::NotificationListQuery,
        responses::NotificationListResponse,
    },
    students::{
        entities::{Student, StudentDetail},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 邮箱比较不区分大小写
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;

    /// 学员档案
    // 在同一事务中创建账号与档案，并生成学号
    async fn create_student(
        &self,
        user: CreateUserRequest,
        student: CreateStudentRequest,
    ) -> Result<StudentDetail>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<StudentDetail>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentDetail>>;
    async fn update_student_photo(&self, id: i64, photo: &str) -> Result<Option<Student>>;
    // 删除档案及其登录账号
    async fn delete_student(&self, id: i64) -> Result<bool>;

    /// 课程
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest)
    -> Result<Option<Course>>;
    async fn delete_course(&self, id: i64) -> Result<bool>;

    /// 讲师
    async fn create_trainer(&self, trainer: CreateTrainerRequest) -> Result<TrainerDetail>;
    async fn get_trainer_by_id(&self, id: i64) -> Result<Option<TrainerDetail>>;
    async fn list_trainers_with_pagination(
        &self,
        query: TrainerListQuery,
    ) -> Result<TrainerListResponse>;
    async fn update_trainer(
        &self,
        id: i64,
        update: UpdateTrainerRequest,
    ) -> Result<Option<TrainerDetail>>;
    async fn delete_trainer(&self, id: i64) -> Result<bool>;

    /// 批次
    async fn create_batch(&self, batch: CreateBatchRequest) -> Result<BatchDetail>;
    async fn get_batch_by_id(&self, id: i64) -> Result<Option<BatchDetail>>;
    async fn list_batches_with_pagination(
        &self,
        query: BatchListQuery,
    ) -> Result<BatchListResponse>;
    async fn update_batch(&self, id: i64, update: UpdateBatchRequest)
    -> Result<Option<BatchDetail>>;
    async fn delete_batch(&self, id: i64) -> Result<bool>;

    /// 报名
    // 校验批次归属、容量与重复报名后写入
    async fn create_enrollment(&self, enrollment: CreateEnrollmentRequest) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<EnrollmentDetail>>;
    async fn find_enrollment(&self, student_id: i64, course_id: i64)
    -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse>;
    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool>;
    async fn count_present_days(&self, student_id: i64) -> Result<i64>;
    // 出勤达标时把 active 报名转为 completed，返回本次转换的报名
    async fn check_and_update_status(&self, student_id: i64) -> Result<Vec<Enrollment>>;

    /// 考勤
    async fn create_attendance(
        &self,
        taken_by: i64,
        attendance: CreateAttendanceRequest,
    ) -> Result<AttendanceRecordDetail>;
    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<AttendanceRecordDetail>>;
    async fn list_attendance_with_pagination(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse>;
    async fn update_attendance(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<AttendanceRecordDetail>>;
    async fn delete_attendance(&self, id: i64) -> Result<bool>;
    async fn list_student_attendance(&self, student_id: i64) -> Result<Vec<MyAttendanceItem>>;
    async fn get_student_attendance_analytics(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentAttendanceAnalytics>>;

    /// 证书
    // 在事务中锁定最新证书并生成编号
    async fn create_certificate(&self, certificate: CreateCertificateRequest)
    -> Result<Certificate>;
    async fn get_certificate_by_id(&self, id: i64) -> Result<Option<CertificateDetail>>;
    async fn get_certificate_by_qr_hash(&self, qr_hash: &str)
    -> Result<Option<CertificateDetail>>;
    async fn find_active_certificate(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Certificate>>;
    async fn list_certificates_with_pagination(
        &self,
        query: CertificateListQuery,
    ) -> Result<CertificateListResponse>;
    async fn update_certificate(
        &self,
        id: i64,
        update: UpdateCertificateRequest,
    ) -> Result<Option<Certificate>>;
    async fn set_certificate_revoked(&self, id: i64, revoked: bool)
    -> Result<Option<Certificate>>;
    async fn set_certificate_pdf_path(&self, id: i64, path: &str) -> Result<bool>;
    async fn delete_certificate(&self, id: i64) -> Result<bool>;

    /// 收费收据
    // 在事务中锁定最新收据并生成编号
    async fn create_receipt(
        &self,
        posted_by: i64,
        receipt: CreateReceiptRequest,
    ) -> Result<FeesReceipt>;
    async fn get_receipt_by_id(&self, id: i64) -> Result<Option<ReceiptDetail>>;
    async fn get_receipt_by_public_id(&self, public_id: &str) -> Result<Option<ReceiptDetail>>;
    async fn list_receipts_with_pagination(
        &self,
        query: ReceiptListQuery,
    ) -> Result<ReceiptListResponse>;
    async fn update_receipt(
        &self,
        id: i64,
        update: UpdateReceiptRequest,
    ) -> Result<Option<FeesReceipt>>;
    async fn lock_receipt(&self, id: i64) -> Result<Option<FeesReceipt>>;
    async fn set_receipt_pdf_path(&self, id: i64, path: &str) -> Result<bool>;
    async fn delete_receipt(&self, id: i64) -> Result<bool>;

    /// 支出
    async fn create_expense(&self, added_by: i64, expense: CreateExpenseRequest)
    -> Result<Expense>;
    async fn get_expense_by_id(&self, id: i64) -> Result<Option<Expense>>;
    async fn list_expenses_with_pagination(
        &self,
        query: ExpenseListQuery,
    ) -> Result<ExpenseListResponse>;
    async fn update_expense(
        &self,
        id: i64,
        update: UpdateExpenseRequest,
    ) -> Result<Option<Expense>>;
    async fn delete_expense(&self, id: i64) -> Result<bool>;

    /// 工资
    async fn create_payroll(&self, payroll: CreatePayrollRequest) -> Result<PayrollDetail>;
    async fn get_payroll_by_id(&self, id: i64) -> Result<Option<PayrollDetail>>;
    async fn list_payrolls_with_pagination(
        &self,
        query: PayrollListQuery,
    ) -> Result<PayrollListResponse>;
    async fn update_payroll(
        &self,
        id: i64,
        update: UpdatePayrollRequest,
    ) -> Result<Option<PayrollDetail>>;
    async fn delete_payroll(&self, id: i64) -> Result<bool>;

    /// 财务统计
    async fn get_finance_analytics(&self) -> Result<FinanceAnalyticsResponse>;
    async fn get_student_outstanding(&self, student_id: i64)
    -> Result<Option<StudentOutstanding>>;
    async fn get_course_outstanding(&self, course_id: i64) -> Result<Option<CourseOutstanding>>;
    async fn get_overall_outstanding(&self) -> Result<OverallOutstanding>;

    /// 会话与消息
    async fn list_conversations_with_pagination(
        &self,
        query: ConversationListQuery,
    ) -> Result<ConversationListResponse>;
    async fn get_conversation_by_id(&self, id: i64) -> Result<Option<Conversation>>;
    async fn get_or_create_conversation(&self, student_id: i64) -> Result<Conversation>;
    async fn list_messages(&self, conversation_id: i64) -> Result<Vec<MessageDetail>>;
    // 标记调用方一侧已读
    async fn mark_conversation_read(&self, conversation_id: i64, by_staff: bool) -> Result<bool>;
    // 写入消息，更新最后消息时间并标记对方未读
    async fn create_message(
        &self,
        conversation_id: i64,
        sender_id: i64,
        sender_is_staff: bool,
        body: &str,
    ) -> Result<Message>;

    /// 通知
    // 按目标批量创建通知，返回创建数量
    async fn send_notifications(
        &self,
        target: NotificationTarget,
        title: &str,
        message: &str,
        level: NotificationLevel,
    ) -> Result<i64>;
    // 通知所有存在 active 报名的学员
    async fn notify_active_students(
        &self,
        title: &str,
        message: &str,
        level: NotificationLevel,
    ) -> Result<i64>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<i64>;
    async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<i64>;
    async fn delete_notification(&self, id: i64, user_id: i64) -> Result<bool>;

    /// 活动
    async fn create_event(&self, created_by: i64, event: CreateEventRequest) -> Result<Event>;
    async fn get_event_by_id(&self, id: i64) -> Result<Option<Event>>;
    async fn list_events_with_pagination(&self, query: EventListQuery)
    -> Result<EventListResponse>;
    async fn update_event(&self, id: i64, update: UpdateEventRequest) -> Result<Option<Event>>;
    async fn delete_event(&self, id: i64) -> Result<bool>;

    /// 系统
    // 数据库连通性检查
    async fn ping(&self) -> Result<()>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

/// 今天（UTC）
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
