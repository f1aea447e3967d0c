use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{
    AttendanceListParams, CreateAttendanceRequest, UpdateAttendanceRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

// 懒加载的全局 AttendanceService 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn list_attendance(
    req: HttpRequest,
    query: web::Query<AttendanceListParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_attendance(query.into_inner(), &req)
        .await
}

pub async fn create_attendance(
    req: HttpRequest,
    data: web::Json<CreateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .create_attendance(data.into_inner(), &req)
        .await
}

pub async fn get_attendance(req: HttpRequest, record_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_attendance(record_id.0, &req).await
}

pub async fn update_attendance(
    req: HttpRequest,
    record_id: SafeIDI64,
    data: web::Json<UpdateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .update_attendance(record_id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_attendance(
    req: HttpRequest,
    record_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete_attendance(record_id.0, &req).await
}

pub async fn my_attendance(req: HttpRequest) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.my_attendance(&req).await
}

pub async fn student_analytics(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .student_analytics(student_id.0, &req)
        .await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            .route("/me", web::get().to(my_attendance))
            .route(
                "/analytics/student/{student_id}",
                web::get().to(student_analytics),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::get().to(list_attendance))
                    .route("", web::post().to(create_attendance))
                    .route("/{id}", web::get().to(get_attendance))
                    .route("/{id}", web::put().to(update_attendance))
                    .route("/{id}", web::patch().to(update_attendance))
                    .route("/{id}", web::delete().to(delete_attendance)),
            ),
    );
}
