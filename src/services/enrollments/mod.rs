pub mod handlers;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::enrollments::requests::{
    CreateEnrollmentRequest, EnrollmentListParams, UpdateEnrollmentRequest,
};

crate::services::lazy_service!(EnrollmentService);

impl EnrollmentService {
    pub async fn list_enrollments(
        &self,
        query: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::list_enrollments(self, query, request).await
    }

    pub async fn create_enrollment(
        &self,
        data: CreateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::create_enrollment(self, data, request).await
    }

    pub async fn get_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::get_enrollment(self, enrollment_id, request).await
    }

    pub async fn update_enrollment(
        &self,
        enrollment_id: i64,
        data: UpdateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::update_enrollment(self, enrollment_id, data, request).await
    }

    pub async fn delete_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::delete_enrollment(self, enrollment_id, request).await
    }
}
