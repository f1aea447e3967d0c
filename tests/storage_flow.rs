use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database};

use institute_backend::errors::InstituteError;
use institute_backend::models::attendance::entities::AttendanceStatus;
use institute_backend::models::attendance::requests::{
    AttendanceEntryInput, CreateAttendanceRequest,
};
use institute_backend::models::certificates::entities::CERTIFICATE_ALREADY_ISSUED;
use institute_backend::models::certificates::requests::CreateCertificateRequest;
use institute_backend::models::courses::requests::{CreateBatchRequest, CreateCourseRequest};
use institute_backend::models::enrollments::entities::EnrollmentStatus;
use institute_backend::models::enrollments::requests::CreateEnrollmentRequest;
use institute_backend::models::finance::entities::{PaymentMode, RECEIPT_LOCKED};
use institute_backend::models::finance::requests::{CreateReceiptRequest, UpdateReceiptRequest};
use institute_backend::models::messaging::requests::ConversationListQuery;
use institute_backend::models::notifications::entities::{NotificationLevel, NotificationTarget};
use institute_backend::models::notifications::requests::NotificationListQuery;
use institute_backend::models::students::entities::StudentDetail;
use institute_backend::models::students::requests::CreateStudentRequest;
use institute_backend::models::users::entities::UserRole;
use institute_backend::models::users::requests::CreateUserRequest;
use institute_backend::storage::{SeaOrmStorage, Storage};

// 内存库只允许一个连接，否则每个连接各自一份空库
async fn setup() -> SeaOrmStorage {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("connect in-memory sqlite");
    SeaOrmStorage::with_connection(db)
        .await
        .expect("run migrations")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn user_request(username: &str, role: UserRole) -> CreateUserRequest {
    CreateUserRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "not-a-real-hash".to_string(),
        role,
        first_name: username.to_string(),
        last_name: "Test".to_string(),
        phone: String::new(),
        address: String::new(),
    }
}

async fn create_student(storage: &SeaOrmStorage, username: &str) -> StudentDetail {
    storage
        .create_student(
            user_request(username, UserRole::Student),
            CreateStudentRequest {
                user: None,
                guardian_name: "Guardian".to_string(),
                guardian_phone: "0000000000".to_string(),
                admission_date: Some(date(2025, 3, 1)),
                address: String::new(),
                active: true,
            },
        )
        .await
        .unwrap()
}

async fn create_course(storage: &SeaOrmStorage, code: &str, required_days: i32) -> i64 {
    storage
        .create_course(CreateCourseRequest {
            code: code.to_string(),
            title: format!("Course {code}"),
            duration_weeks: 12,
            total_fees: 1000.0,
            syllabus: String::new(),
            active: true,
            required_attendance_days: required_days,
        })
        .await
        .unwrap()
        .id
}

fn present(student_id: i64) -> AttendanceEntryInput {
    AttendanceEntryInput {
        student_id,
        status: AttendanceStatus::Present,
        remarks: String::new(),
    }
}

fn receipt(student_id: i64, course_id: i64, amount: f64) -> CreateReceiptRequest {
    CreateReceiptRequest {
        student_id,
        course_id: Some(course_id),
        batch_id: None,
        amount,
        mode: PaymentMode::Cash,
        txn_id: String::new(),
        date: Some(date(2025, 3, 10)),
    }
}

#[tokio::test]
async fn student_gets_registration_number_and_delete_removes_account() {
    let storage = setup().await;
    let detail = create_student(&storage, "asha").await;

    assert_eq!(
        detail.student.reg_no.as_deref(),
        Some(format!("STU2025-{:04}", detail.student.id).as_str())
    );
    assert_eq!(detail.user.role, UserRole::Student);
    assert_eq!(
        storage
            .get_student_by_user_id(detail.user.id)
            .await
            .unwrap()
            .map(|s| s.id),
        Some(detail.student.id)
    );

    assert!(storage.delete_student(detail.student.id).await.unwrap());
    assert!(storage.get_user_by_id(detail.user.id).await.unwrap().is_none());
}

#[tokio::test]
async fn enrollment_rejects_duplicates_and_full_batches() {
    let storage = setup().await;
    let course_id = create_course(&storage, "WLD", 36).await;
    let batch = storage
        .create_batch(CreateBatchRequest {
            course_id,
            trainer_id: None,
            code: "WLD-A".to_string(),
            capacity: 1,
            schedule: String::new(),
        })
        .await
        .unwrap();
    let first = create_student(&storage, "first").await;
    let second = create_student(&storage, "second").await;

    let enrollment = storage
        .create_enrollment(CreateEnrollmentRequest {
            student_id: first.student.id,
            course_id,
            batch_id: Some(batch.batch.id),
        })
        .await
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Active);

    let duplicate = storage
        .create_enrollment(CreateEnrollmentRequest {
            student_id: first.student.id,
            course_id,
            batch_id: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, InstituteError::Validation(_)));
    assert!(duplicate.message().contains("already enrolled"));

    let full = storage
        .create_enrollment(CreateEnrollmentRequest {
            student_id: second.student.id,
            course_id,
            batch_id: Some(batch.batch.id),
        })
        .await
        .unwrap_err();
    assert!(full.message().contains("capacity"));
}

#[tokio::test]
async fn attendance_completes_enrollment_once_required_days_are_met() {
    let storage = setup().await;
    let course_id = create_course(&storage, "ELC", 2).await;
    let student = create_student(&storage, "ravi").await;
    let staff = storage
        .create_user(user_request("staffer", UserRole::Staff))
        .await
        .unwrap();
    storage
        .create_enrollment(CreateEnrollmentRequest {
            student_id: student.student.id,
            course_id,
            batch_id: None,
        })
        .await
        .unwrap();

    storage
        .create_attendance(
            staff.id,
            CreateAttendanceRequest {
                date: date(2025, 3, 3),
                remarks: String::new(),
                entries: vec![present(student.student.id)],
            },
        )
        .await
        .unwrap();
    assert!(
        storage
            .check_and_update_status(student.student.id)
            .await
            .unwrap()
            .is_empty()
    );

    let conflict = storage
        .create_attendance(
            staff.id,
            CreateAttendanceRequest {
                date: date(2025, 3, 3),
                remarks: String::new(),
                entries: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(conflict, InstituteError::Conflict(_)));

    storage
        .create_attendance(
            staff.id,
            CreateAttendanceRequest {
                date: date(2025, 3, 4),
                remarks: String::new(),
                entries: vec![present(student.student.id)],
            },
        )
        .await
        .unwrap();
    assert_eq!(storage.count_present_days(student.student.id).await.unwrap(), 2);

    let completed = storage
        .check_and_update_status(student.student.id)
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].status, EnrollmentStatus::Completed);
    assert!(completed[0].completion_date.is_some());

    // 已结业的报名不会重复处理
    assert!(
        storage
            .check_and_update_status(student.student.id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn receipts_are_numbered_in_sequence_and_lock_blocks_edits() {
    let storage = setup().await;
    let course_id = create_course(&storage, "TLR", 36).await;
    let student = create_student(&storage, "meena").await;
    let staff = storage
        .create_user(user_request("cashier", UserRole::Staff))
        .await
        .unwrap();
    storage
        .create_enrollment(CreateEnrollmentRequest {
            student_id: student.student.id,
            course_id,
            batch_id: None,
        })
        .await
        .unwrap();

    let first = storage
        .create_receipt(staff.id, receipt(student.student.id, course_id, 400.0))
        .await
        .unwrap();
    let second = storage
        .create_receipt(staff.id, receipt(student.student.id, course_id, 100.0))
        .await
        .unwrap();
    assert_eq!(first.receipt_no, "RCP-000001");
    assert_eq!(second.receipt_no, "RCP-000002");
    assert_ne!(first.public_id, second.public_id);

    let public = storage
        .get_receipt_by_public_id(&first.public_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(public.receipt.id, first.id);

    let outstanding = storage
        .get_student_outstanding(student.student.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outstanding.total_fees, 1000.0);
    assert_eq!(outstanding.total_paid, 500.0);
    assert_eq!(outstanding.total_due, 500.0);

    let locked = storage.lock_receipt(first.id).await.unwrap().unwrap();
    assert!(locked.locked);

    let err = storage
        .update_receipt(
            first.id,
            UpdateReceiptRequest {
                course_id: None,
                batch_id: None,
                amount: Some(10.0),
                mode: None,
                txn_id: None,
                date: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.message(), RECEIPT_LOCKED);
}

#[tokio::test]
async fn certificate_numbers_continue_across_issue_dates_and_revocation_toggles() {
    let storage = setup().await;
    let course_id = create_course(&storage, "CMP", 36).await;
    let student = create_student(&storage, "kiran").await;
    let other = create_student(&storage, "meera").await;

    let certificate = storage
        .create_certificate(CreateCertificateRequest {
            student_id: student.student.id,
            course_id,
            issue_date: Some(date(2025, 6, 30)),
            remarks: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(certificate.certificate_no, "CERT-20250630-0001");
    assert!(!certificate.revoked);

    // 序号全局递增，不随签发日期重置
    let next_day = storage
        .create_certificate(CreateCertificateRequest {
            student_id: other.student.id,
            course_id,
            issue_date: Some(date(2025, 7, 1)),
            remarks: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(next_day.certificate_no, "CERT-20250701-0002");

    let by_hash = storage
        .get_certificate_by_qr_hash(&certificate.qr_hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_hash.certificate.id, certificate.id);

    storage
        .set_certificate_revoked(certificate.id, true)
        .await
        .unwrap();
    assert!(
        storage
            .find_active_certificate(student.student.id, course_id)
            .await
            .unwrap()
            .is_none()
    );

    storage
        .set_certificate_revoked(certificate.id, false)
        .await
        .unwrap();
    assert!(
        storage
            .find_active_certificate(student.student.id, course_id)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn only_one_active_certificate_per_student_and_course() {
    let storage = setup().await;
    let course_id = create_course(&storage, "TLY", 30).await;
    let student = create_student(&storage, "asha").await;
    let request = || CreateCertificateRequest {
        student_id: student.student.id,
        course_id,
        issue_date: Some(date(2025, 8, 1)),
        remarks: String::new(),
    };

    let first = storage.create_certificate(request()).await.unwrap();

    let duplicate = storage.create_certificate(request()).await.unwrap_err();
    assert!(matches!(duplicate, InstituteError::Validation(_)));
    assert_eq!(duplicate.message(), CERTIFICATE_ALREADY_ISSUED);

    storage.set_certificate_revoked(first.id, true).await.unwrap();
    let reissued = storage.create_certificate(request()).await.unwrap();

    // 已有重发证书时，旧证书不能恢复
    let restore = storage
        .set_certificate_revoked(first.id, false)
        .await
        .unwrap_err();
    assert!(matches!(restore, InstituteError::Validation(_)));
    assert_eq!(restore.message(), CERTIFICATE_ALREADY_ISSUED);

    let active = storage
        .find_active_certificate(student.student.id, course_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(active.id, reissued.id);

    let still_revoked = storage.get_certificate_by_id(first.id).await.unwrap().unwrap();
    assert!(still_revoked.certificate.revoked);

    // 重发证书吊销后，旧证书可以恢复
    storage
        .set_certificate_revoked(reissued.id, true)
        .await
        .unwrap();
    let restored = storage
        .set_certificate_revoked(first.id, false)
        .await
        .unwrap()
        .unwrap();
    assert!(!restored.revoked);
}

#[tokio::test]
async fn notifications_fan_out_by_role_and_track_read_state() {
    let storage = setup().await;
    let one = create_student(&storage, "one").await;
    create_student(&storage, "two").await;
    storage
        .create_user(user_request("office", UserRole::Staff))
        .await
        .unwrap();

    let sent = storage
        .send_notifications(
            NotificationTarget::Role(UserRole::Student),
            "Holiday",
            "Institute closed on Friday.",
            NotificationLevel::Info,
        )
        .await
        .unwrap();
    assert_eq!(sent, 2);
    assert_eq!(
        storage.count_unread_notifications(one.user.id).await.unwrap(),
        1
    );

    let list = storage
        .list_notifications_with_pagination(
            one.user.id,
            NotificationListQuery {
                page: None,
                size: None,
                unread: Some(true),
            },
        )
        .await
        .unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.items[0].title, "Holiday");

    assert_eq!(
        storage.mark_all_notifications_read(one.user.id).await.unwrap(),
        1
    );
    assert_eq!(
        storage.count_unread_notifications(one.user.id).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn conversation_read_flags_follow_the_last_sender() {
    let storage = setup().await;
    let student = create_student(&storage, "sana").await;
    let staff = storage
        .create_user(user_request("desk", UserRole::Staff))
        .await
        .unwrap();

    let conversation = storage
        .get_or_create_conversation(student.student.id)
        .await
        .unwrap();
    let again = storage
        .get_or_create_conversation(student.student.id)
        .await
        .unwrap();
    assert_eq!(conversation.id, again.id);

    storage
        .create_message(conversation.id, student.user.id, false, "When is the exam?")
        .await
        .unwrap();
    let after_student = storage
        .get_conversation_by_id(conversation.id)
        .await
        .unwrap()
        .unwrap();
    assert!(after_student.student_read);
    assert!(!after_student.admin_read);

    storage
        .create_message(conversation.id, staff.id, true, "Next Monday.")
        .await
        .unwrap();
    storage
        .mark_conversation_read(conversation.id, false)
        .await
        .unwrap();
    let after_reply = storage
        .get_conversation_by_id(conversation.id)
        .await
        .unwrap()
        .unwrap();
    assert!(after_reply.student_read);
    assert!(after_reply.admin_read);

    let messages = storage.list_messages(conversation.id).await.unwrap();
    assert_eq!(messages.len(), 2);

    let listed = storage
        .list_conversations_with_pagination(ConversationListQuery {
            page: None,
            size: None,
            student_id: Some(student.student.id),
            search: None,
        })
        .await
        .unwrap();
    assert_eq!(listed.items.len(), 1);
}
