//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod analytics;
mod attendance;
mod batches;
mod certificates;
mod courses;
mod enrollments;
mod events;
mod expenses;
mod messaging;
mod notifications;
mod payrolls;
mod receipts;
mod students;
mod trainers;
mod users;

use crate::config::AppConfig;
use crate::errors::{InstituteError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::with_connection(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(storage)
    }

    /// 使用已有连接创建存储并运行迁移
    pub async fn with_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| InstituteError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| InstituteError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| InstituteError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| InstituteError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(InstituteError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 唯一约束冲突转换为 Conflict，其余为数据库操作错误
pub(crate) fn map_write_err(e: DbErr, context: &str, conflict: &str) -> InstituteError {
    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        InstituteError::conflict(conflict)
    } else {
        InstituteError::database_operation(format!("{context}: {e}"))
    }
}

// Storage trait 实现
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

use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户管理方法
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 学员档案
    async fn create_student(
        &self,
        user: CreateUserRequest,
        student: CreateStudentRequest,
    ) -> Result<StudentDetail> {
        self.create_student_impl(user, student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<StudentDetail>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<StudentDetail>> {
        self.update_student_impl(id, update).await
    }

    async fn update_student_photo(&self, id: i64, photo: &str) -> Result<Option<Student>> {
        self.update_student_photo_impl(id, photo).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    // 课程
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(&self, id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    // 讲师
    async fn create_trainer(&self, trainer: CreateTrainerRequest) -> Result<TrainerDetail> {
        self.create_trainer_impl(trainer).await
    }

    async fn get_trainer_by_id(&self, id: i64) -> Result<Option<TrainerDetail>> {
        self.get_trainer_by_id_impl(id).await
    }

    async fn list_trainers_with_pagination(
        &self,
        query: TrainerListQuery,
    ) -> Result<TrainerListResponse> {
        self.list_trainers_with_pagination_impl(query).await
    }

    async fn update_trainer(
        &self,
        id: i64,
        update: UpdateTrainerRequest,
    ) -> Result<Option<TrainerDetail>> {
        self.update_trainer_impl(id, update).await
    }

    async fn delete_trainer(&self, id: i64) -> Result<bool> {
        self.delete_trainer_impl(id).await
    }

    // 批次
    async fn create_batch(&self, batch: CreateBatchRequest) -> Result<BatchDetail> {
        self.create_batch_impl(batch).await
    }

    async fn get_batch_by_id(&self, id: i64) -> Result<Option<BatchDetail>> {
        self.get_batch_by_id_impl(id).await
    }

    async fn list_batches_with_pagination(
        &self,
        query: BatchListQuery,
    ) -> Result<BatchListResponse> {
        self.list_batches_with_pagination_impl(query).await
    }

    async fn update_batch(
        &self,
        id: i64,
        update: UpdateBatchRequest,
    ) -> Result<Option<BatchDetail>> {
        self.update_batch_impl(id, update).await
    }

    async fn delete_batch(&self, id: i64) -> Result<bool> {
        self.delete_batch_impl(id).await
    }

    // 报名
    async fn create_enrollment(&self, enrollment: CreateEnrollmentRequest) -> Result<Enrollment> {
        self.create_enrollment_impl(enrollment).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<EnrollmentDetail>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn find_enrollment(&self, student_id: i64, course_id: i64) -> Result<Option<Enrollment>> {
        self.find_enrollment_impl(student_id, course_id).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_impl(id, update).await
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool> {
        self.delete_enrollment_impl(id).await
    }

    async fn count_present_days(&self, student_id: i64) -> Result<i64> {
        self.count_present_days_impl(student_id).await
    }

    async fn check_and_update_status(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        self.check_and_update_status_impl(student_id).await
    }

    // 考勤
    async fn create_attendance(
        &self,
        taken_by: i64,
        attendance: CreateAttendanceRequest,
    ) -> Result<AttendanceRecordDetail> {
        self.create_attendance_impl(taken_by, attendance).await
    }

    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<AttendanceRecordDetail>> {
        self.get_attendance_by_id_impl(id).await
    }

    async fn list_attendance_with_pagination(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        self.list_attendance_with_pagination_impl(query).await
    }

    async fn update_attendance(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<AttendanceRecordDetail>> {
        self.update_attendance_impl(id, update).await
    }

    async fn delete_attendance(&self, id: i64) -> Result<bool> {
        self.delete_attendance_impl(id).await
    }

    async fn list_student_attendance(&self, student_id: i64) -> Result<Vec<MyAttendanceItem>> {
        self.list_student_attendance_impl(student_id).await
    }

    async fn get_student_attendance_analytics(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentAttendanceAnalytics>> {
        self.get_student_attendance_analytics_impl(student_id).await
    }

    // 证书
    async fn create_certificate(
        &self,
        certificate: CreateCertificateRequest,
    ) -> Result<Certificate> {
        self.create_certificate_impl(certificate).await
    }

    async fn get_certificate_by_id(&self, id: i64) -> Result<Option<CertificateDetail>> {
        self.get_certificate_by_id_impl(id).await
    }

    async fn get_certificate_by_qr_hash(&self, qr_hash: &str) -> Result<Option<CertificateDetail>> {
        self.get_certificate_by_qr_hash_impl(qr_hash).await
    }

    async fn find_active_certificate(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Certificate>> {
        self.find_active_certificate_impl(student_id, course_id).await
    }

    async fn list_certificates_with_pagination(
        &self,
        query: CertificateListQuery,
    ) -> Result<CertificateListResponse> {
        self.list_certificates_with_pagination_impl(query).await
    }

    async fn update_certificate(
        &self,
        id: i64,
        update: UpdateCertificateRequest,
    ) -> Result<Option<Certificate>> {
        self.update_certificate_impl(id, update).await
    }

    async fn set_certificate_revoked(&self, id: i64, revoked: bool) -> Result<Option<Certificate>> {
        self.set_certificate_revoked_impl(id, revoked).await
    }

    async fn set_certificate_pdf_path(&self, id: i64, path: &str) -> Result<bool> {
        self.set_certificate_pdf_path_impl(id, path).await
    }

    async fn delete_certificate(&self, id: i64) -> Result<bool> {
        self.delete_certificate_impl(id).await
    }

    // 收费收据
    async fn create_receipt(
        &self,
        posted_by: i64,
        receipt: CreateReceiptRequest,
    ) -> Result<FeesReceipt> {
        self.create_receipt_impl(posted_by, receipt).await
    }

    async fn get_receipt_by_id(&self, id: i64) -> Result<Option<ReceiptDetail>> {
        self.get_receipt_by_id_impl(id).await
    }

    async fn get_receipt_by_public_id(&self, public_id: &str) -> Result<Option<ReceiptDetail>> {
        self.get_receipt_by_public_id_impl(public_id).await
    }

    async fn list_receipts_with_pagination(
        &self,
        query: ReceiptListQuery,
    ) -> Result<ReceiptListResponse> {
        self.list_receipts_with_pagination_impl(query).await
    }

    async fn update_receipt(
        &self,
        id: i64,
        update: UpdateReceiptRequest,
    ) -> Result<Option<FeesReceipt>> {
        self.update_receipt_impl(id, update).await
    }

    async fn lock_receipt(&self, id: i64) -> Result<Option<FeesReceipt>> {
        self.lock_receipt_impl(id).await
    }

    async fn set_receipt_pdf_path(&self, id: i64, path: &str) -> Result<bool> {
        self.set_receipt_pdf_path_impl(id, path).await
    }

    async fn delete_receipt(&self, id: i64) -> Result<bool> {
        self.delete_receipt_impl(id).await
    }

    // 支出
    async fn create_expense(
        &self,
        added_by: i64,
        expense: CreateExpenseRequest,
    ) -> Result<Expense> {
        self.create_expense_impl(added_by, expense).await
    }

    async fn get_expense_by_id(&self, id: i64) -> Result<Option<Expense>> {
        self.get_expense_by_id_impl(id).await
    }

    async fn list_expenses_with_pagination(
        &self,
        query: ExpenseListQuery,
    ) -> Result<ExpenseListResponse> {
        self.list_expenses_with_pagination_impl(query).await
    }

    async fn update_expense(
        &self,
        id: i64,
        update: UpdateExpenseRequest,
    ) -> Result<Option<Expense>> {
        self.update_expense_impl(id, update).await
    }

    async fn delete_expense(&self, id: i64) -> Result<bool> {
        self.delete_expense_impl(id).await
    }

    // 工资
    async fn create_payroll(&self, payroll: CreatePayrollRequest) -> Result<PayrollDetail> {
        self.create_payroll_impl(payroll).await
    }

    async fn get_payroll_by_id(&self, id: i64) -> Result<Option<PayrollDetail>> {
        self.get_payroll_by_id_impl(id).await
    }

    async fn list_payrolls_with_pagination(
        &self,
        query: PayrollListQuery,
    ) -> Result<PayrollListResponse> {
        self.list_payrolls_with_pagination_impl(query).await
    }

    async fn update_payroll(
        &self,
        id: i64,
        update: UpdatePayrollRequest,
    ) -> Result<Option<PayrollDetail>> {
        self.update_payroll_impl(id, update).await
    }

    async fn delete_payroll(&self, id: i64) -> Result<bool> {
        self.delete_payroll_impl(id).await
    }

    // 财务统计
    async fn get_finance_analytics(&self) -> Result<FinanceAnalyticsResponse> {
        self.get_finance_analytics_impl().await
    }

    async fn get_student_outstanding(&self, student_id: i64) -> Result<Option<StudentOutstanding>> {
        self.get_student_outstanding_impl(student_id).await
    }

    async fn get_course_outstanding(&self, course_id: i64) -> Result<Option<CourseOutstanding>> {
        self.get_course_outstanding_impl(course_id).await
    }

    async fn get_overall_outstanding(&self) -> Result<OverallOutstanding> {
        self.get_overall_outstanding_impl().await
    }

    // 会话与消息
    async fn list_conversations_with_pagination(
        &self,
        query: ConversationListQuery,
    ) -> Result<ConversationListResponse> {
        self.list_conversations_with_pagination_impl(query).await
    }

    async fn get_conversation_by_id(&self, id: i64) -> Result<Option<Conversation>> {
        self.get_conversation_by_id_impl(id).await
    }

    async fn get_or_create_conversation(&self, student_id: i64) -> Result<Conversation> {
        self.get_or_create_conversation_impl(student_id).await
    }

    async fn list_messages(&self, conversation_id: i64) -> Result<Vec<MessageDetail>> {
        self.list_messages_impl(conversation_id).await
    }

    async fn mark_conversation_read(&self, conversation_id: i64, by_staff: bool) -> Result<bool> {
        self.mark_conversation_read_impl(conversation_id, by_staff).await
    }

    async fn create_message(
        &self,
        conversation_id: i64,
        sender_id: i64,
        sender_is_staff: bool,
        body: &str,
    ) -> Result<Message> {
        self.create_message_impl(conversation_id, sender_id, sender_is_staff, body).await
    }

    // 通知
    async fn send_notifications(
        &self,
        target: NotificationTarget,
        title: &str,
        message: &str,
        level: NotificationLevel,
    ) -> Result<i64> {
        self.send_notifications_impl(target, title, message, level).await
    }

    async fn notify_active_students(
        &self,
        title: &str,
        message: &str,
        level: NotificationLevel,
    ) -> Result<i64> {
        self.notify_active_students_impl(title, message, level).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, query).await
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<i64> {
        self.count_unread_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, id: i64, user_id: i64) -> Result<bool> {
        self.mark_notification_read_impl(id, user_id).await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<i64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    async fn delete_notification(&self, id: i64, user_id: i64) -> Result<bool> {
        self.delete_notification_impl(id, user_id).await
    }

    // 活动
    async fn create_event(&self, created_by: i64, event: CreateEventRequest) -> Result<Event> {
        self.create_event_impl(created_by, event).await
    }

    async fn get_event_by_id(&self, id: i64) -> Result<Option<Event>> {
        self.get_event_by_id_impl(id).await
    }

    async fn list_events_with_pagination(
        &self,
        query: EventListQuery,
    ) -> Result<EventListResponse> {
        self.list_events_with_pagination_impl(query).await
    }

    async fn update_event(&self, id: i64, update: UpdateEventRequest) -> Result<Option<Event>> {
        self.update_event_impl(id, update).await
    }

    async fn delete_event(&self, id: i64) -> Result<bool> {
        self.delete_event_impl(id).await
    }

    // 系统
    async fn ping(&self) -> Result<()> {
        self.ping_impl().await
    }
}
