use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::{error, info};

use super::CertificateService;
use crate::models::certificates::entities::{CERTIFICATE_ALREADY_ISSUED, CertificateDetail};
use crate::models::certificates::requests::{
    CertificateListParams, CertificateListQuery, CreateCertificateRequest,
    UpdateCertificateRequest,
};
use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::documents::generate_certificate_pdf;
use crate::services::{bad_request, not_found, require_student, storage_error_response};
use crate::storage::Storage;

const MY_CERTIFICATES_PAGE_SIZE: i64 = 100;

/// 未结业时的拒绝原因
pub(crate) fn eligibility_error(
    enrollment: Option<&Enrollment>,
    present_days: i64,
    required_days: i32,
) -> Option<String> {
    match enrollment.map(|e| e.status) {
        Some(EnrollmentStatus::Completed) => None,
        Some(EnrollmentStatus::Active) => Some(format!(
            "Student has not completed this course yet. Attendance: {present_days}/{required_days} days."
        )),
        _ => Some("Student is not enrolled in this course or has dropped it.".to_string()),
    }
}

/// 检查学员是否可获发证书，可发时返回 None
async fn check_eligibility(
    storage: &Arc<dyn Storage>,
    student_id: i64,
    course_id: i64,
) -> Result<Option<HttpResponse>, HttpResponse> {
    match storage.find_active_certificate(student_id, course_id).await {
        Ok(Some(_)) => {
            return Ok(Some(bad_request(
                ErrorCode::CertificateAlreadyIssued,
                CERTIFICATE_ALREADY_ISSUED,
            )));
        }
        Ok(None) => {}
        Err(e) => return Err(storage_error_response(e, ErrorCode::InternalServerError)),
    }

    let course = match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => course,
        Ok(None) => {
            return Ok(Some(bad_request(
                ErrorCode::CertificateNotEligible,
                "Selected course does not exist.",
            )));
        }
        Err(e) => return Err(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    let enrollment = storage
        .find_enrollment(student_id, course_id)
        .await
        .map_err(|e| storage_error_response(e, ErrorCode::InternalServerError))?;

    let present_days = match enrollment {
        Some(ref e) if e.status == EnrollmentStatus::Active => storage
            .count_present_days(student_id)
            .await
            .map_err(|e| storage_error_response(e, ErrorCode::InternalServerError))?,
        _ => 0,
    };

    Ok(
        eligibility_error(enrollment.as_ref(), present_days, course.required_attendance_days)
            .map(|msg| bad_request(ErrorCode::CertificateNotEligible, msg)),
    )
}

pub async fn list_certificates(
    service: &CertificateService,
    query: CertificateListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = CertificateListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        student_id: query.student_id,
        course_id: query.course_id,
        revoked: query.revoked,
        search: query.search,
    };

    match storage.list_certificates_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Certificate list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_certificate(
    service: &CertificateService,
    data: CreateCertificateRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match check_eligibility(&storage, data.student_id, data.course_id).await {
        Ok(None) => {}
        Ok(Some(resp)) | Err(resp) => return Ok(resp),
    }

    let certificate = match storage.create_certificate(data).await {
        Ok(certificate) => certificate,
        Err(e) => return Ok(storage_error_response(e, ErrorCode::CertificateAlreadyIssued)),
    };
    info!(
        "Certificate {} issued to student {}",
        certificate.certificate_no, certificate.student_id
    );

    let detail = match storage.get_certificate_by_id(certificate.id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::CertificateNotFound,
                "Certificate not found.",
            ));
        }
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    // PDF 失败不影响证书本身
    let has_pdf = match generate_certificate_pdf(&storage, &detail).await {
        Ok(_) => true,
        Err(e) => {
            error!(
                "Failed to render certificate {}: {}",
                detail.certificate.certificate_no, e
            );
            false
        }
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(
        CertificateDetail { has_pdf, ..detail },
        "Certificate created successfully",
    )))
}

pub async fn get_certificate(
    service: &CertificateService,
    certificate_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_certificate_by_id(certificate_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Certificate retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::CertificateNotFound,
            "Certificate not found.",
        )),
        Err(e) => Ok(storage_error_response(e, ErrorCode::CertificateNotFound)),
    }
}

pub async fn update_certificate(
    service: &CertificateService,
    certificate_id: i64,
    data: UpdateCertificateRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.update_certificate(certificate_id, data).await {
        Ok(Some(certificate)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            certificate,
            "Certificate updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::CertificateNotFound,
            "Certificate not found.",
        )),
        Err(e) => Ok(storage_error_response(e, ErrorCode::CertificateNotFound)),
    }
}

pub async fn delete_certificate(
    service: &CertificateService,
    certificate_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_certificate(certificate_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Certificate deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::CertificateNotFound,
            "Certificate not found.",
        )),
        Err(e) => Ok(storage_error_response(e, ErrorCode::CertificateNotFound)),
    }
}

/// 撤销与恢复互相切换
pub async fn toggle_revoked(
    service: &CertificateService,
    certificate_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current = match storage.get_certificate_by_id(certificate_id).await {
        Ok(Some(detail)) => detail.certificate,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::CertificateNotFound,
                "Certificate not found.",
            ));
        }
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    match storage
        .set_certificate_revoked(certificate_id, !current.revoked)
        .await
    {
        Ok(Some(certificate)) => {
            let message = if certificate.revoked {
                "Certificate revoked"
            } else {
                "Certificate restored"
            };
            info!("{} {}", message, certificate.certificate_no);
            Ok(HttpResponse::Ok().json(ApiResponse::success(certificate, message)))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::CertificateNotFound,
            "Certificate not found.",
        )),
        Err(e) => Ok(storage_error_response(e, ErrorCode::CertificateAlreadyIssued)),
    }
}

pub async fn my_certificates(
    service: &CertificateService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (_, student) = match require_student(&storage, request).await {
        Ok(pair) => pair,
        Err(resp) => return Ok(resp),
    };

    let certificates =
        match collect_active_certificates(storage.as_ref(), student.id, MY_CERTIFICATES_PAGE_SIZE)
            .await
        {
            Ok(certificates) => certificates,
            Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
        };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        certificates,
        "Certificates retrieved successfully",
    )))
}

/// 逐页取完学员的有效证书，不截断
pub(crate) async fn collect_active_certificates(
    storage: &dyn Storage,
    student_id: i64,
    page_size: i64,
) -> crate::errors::Result<Vec<CertificateDetail>> {
    let mut certificates = Vec::new();
    let mut page = 1;
    loop {
        let query = CertificateListQuery {
            page: Some(page),
            size: Some(page_size),
            student_id: Some(student_id),
            revoked: Some(false),
            ..Default::default()
        };
        let response = storage.list_certificates_with_pagination(query).await?;
        certificates.extend(response.items);
        if page >= response.pagination.total_pages {
            return Ok(certificates);
        }
        page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn enrollment(status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            id: 1,
            student_id: 1,
            course_id: 1,
            batch_id: None,
            enrolled_on: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            completion_date: None,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_completed_enrollment_is_eligible() {
        let completed = enrollment(EnrollmentStatus::Completed);
        assert_eq!(eligibility_error(Some(&completed), 0, 36), None);
    }

    #[test]
    fn test_active_enrollment_reports_progress() {
        let active = enrollment(EnrollmentStatus::Active);
        assert_eq!(
            eligibility_error(Some(&active), 20, 36).as_deref(),
            Some("Student has not completed this course yet. Attendance: 20/36 days.")
        );
    }

    #[test]
    fn test_missing_or_dropped_enrollment() {
        let dropped = enrollment(EnrollmentStatus::Dropped);
        let expected = Some("Student is not enrolled in this course or has dropped it.");
        assert_eq!(eligibility_error(Some(&dropped), 40, 36).as_deref(), expected);
        assert_eq!(eligibility_error(None, 0, 36).as_deref(), expected);
    }

    #[tokio::test]
    async fn test_active_certificates_are_collected_across_pages() {
        use crate::models::courses::requests::CreateCourseRequest;
        use crate::models::students::requests::CreateStudentRequest;
        use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
        use crate::storage::SeaOrmStorage;
        use sea_orm::{ConnectOptions, Database};

        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        let storage = SeaOrmStorage::with_connection(db).await.unwrap();

        let student = storage
            .create_student(
                CreateUserRequest {
                    username: "ravi".to_string(),
                    email: "ravi@example.com".to_string(),
                    password: "not-a-real-hash".to_string(),
                    role: UserRole::Student,
                    first_name: "Ravi".to_string(),
                    last_name: "Test".to_string(),
                    phone: String::new(),
                    address: String::new(),
                },
                CreateStudentRequest {
                    user: None,
                    guardian_name: "Guardian".to_string(),
                    guardian_phone: "0000000000".to_string(),
                    admission_date: None,
                    address: String::new(),
                    active: true,
                },
            )
            .await
            .unwrap()
            .student;

        let mut issued = Vec::new();
        for code in ["A1", "A2", "A3", "A4", "A5"] {
            let course = storage
                .create_course(CreateCourseRequest {
                    code: code.to_string(),
                    title: format!("Course {code}"),
                    duration_weeks: 4,
                    total_fees: 500.0,
                    syllabus: String::new(),
                    active: true,
                    required_attendance_days: 10,
                })
                .await
                .unwrap();
            let certificate = storage
                .create_certificate(CreateCertificateRequest {
                    student_id: student.id,
                    course_id: course.id,
                    issue_date: None,
                    remarks: String::new(),
                })
                .await
                .unwrap();
            issued.push(certificate.id);
        }
        storage
            .set_certificate_revoked(issued[0], true)
            .await
            .unwrap();

        let collected = collect_active_certificates(&storage, student.id, 2)
            .await
            .unwrap();
        let mut ids: Vec<i64> = collected.iter().map(|c| c.certificate.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, issued[1..].to_vec());
    }
}
