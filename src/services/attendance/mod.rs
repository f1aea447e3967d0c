pub mod handlers;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::attendance::requests::{
    AttendanceListParams, CreateAttendanceRequest, UpdateAttendanceRequest,
};

crate::services::lazy_service!(AttendanceService);

impl AttendanceService {
    pub async fn list_attendance(
        &self,
        query: AttendanceListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::list_attendance(self, query, request).await
    }

    pub async fn create_attendance(
        &self,
        data: CreateAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::create_attendance(self, data, request).await
    }

    pub async fn get_attendance(
        &self,
        record_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::get_attendance(self, record_id, request).await
    }

    pub async fn update_attendance(
        &self,
        record_id: i64,
        data: UpdateAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::update_attendance(self, record_id, data, request).await
    }

    pub async fn delete_attendance(
        &self,
        record_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::delete_attendance(self, record_id, request).await
    }

    pub async fn my_attendance(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        handlers::my_attendance(self, request).await
    }

    pub async fn student_analytics(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::student_analytics(self, student_id, request).await
    }
}
