//! 课程、讲师与批次路由
//!
//! 课程和批次对所有登录用户只读开放，写操作仅职员；讲师档案仅职员。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::requests::{
    BatchListParams, CourseListParams, CreateBatchRequest, CreateCourseRequest,
    CreateTrainerRequest, TrainerListParams, UpdateBatchRequest, UpdateCourseRequest,
    UpdateTrainerRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{BatchService, CourseService, TrainerService};
use crate::utils::SafeIDI64;

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);
static TRAINER_SERVICE: Lazy<TrainerService> = Lazy::new(TrainerService::new_lazy);
static BATCH_SERVICE: Lazy<BatchService> = Lazy::new(BatchService::new_lazy);

// 课程
pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(data.into_inner(), &req).await
}

pub async fn get_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(course_id.0, &req).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeIDI64,
    data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(course_id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(course_id.0, &req).await
}

// 讲师
pub async fn list_trainers(
    req: HttpRequest,
    query: web::Query<TrainerListParams>,
) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE.list_trainers(query.into_inner(), &req).await
}

pub async fn create_trainer(
    req: HttpRequest,
    data: web::Json<CreateTrainerRequest>,
) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE.create_trainer(data.into_inner(), &req).await
}

pub async fn get_trainer(req: HttpRequest, trainer_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE.get_trainer(trainer_id.0, &req).await
}

pub async fn update_trainer(
    req: HttpRequest,
    trainer_id: SafeIDI64,
    data: web::Json<UpdateTrainerRequest>,
) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE
        .update_trainer(trainer_id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_trainer(req: HttpRequest, trainer_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TRAINER_SERVICE.delete_trainer(trainer_id.0, &req).await
}

// 批次
pub async fn list_batches(
    req: HttpRequest,
    query: web::Query<BatchListParams>,
) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.list_batches(query.into_inner(), &req).await
}

pub async fn create_batch(
    req: HttpRequest,
    data: web::Json<CreateBatchRequest>,
) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.create_batch(data.into_inner(), &req).await
}

pub async fn get_batch(req: HttpRequest, batch_id: SafeIDI64) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.get_batch(batch_id.0, &req).await
}

pub async fn update_batch(
    req: HttpRequest,
    batch_id: SafeIDI64,
    data: web::Json<UpdateBatchRequest>,
) -> ActixResult<HttpResponse> {
    BATCH_SERVICE
        .update_batch(batch_id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_batch(req: HttpRequest, batch_id: SafeIDI64) -> ActixResult<HttpResponse> {
    BATCH_SERVICE.delete_batch(batch_id.0, &req).await
}

pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_courses))
            .route("/{id}", web::get().to(get_course))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::post().to(create_course))
                    .route("/{id}", web::put().to(update_course))
                    .route("/{id}", web::patch().to(update_course))
                    .route("/{id}", web::delete().to(delete_course)),
            ),
    );
}

pub fn configure_trainer_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/trainers")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::get().to(list_trainers))
                    .route("", web::post().to(create_trainer))
                    .route("/{id}", web::get().to(get_trainer))
                    .route("/{id}", web::put().to(update_trainer))
                    .route("/{id}", web::patch().to(update_trainer))
                    .route("/{id}", web::delete().to(delete_trainer)),
            ),
    );
}

pub fn configure_batch_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/batches")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_batches))
            .route("/{id}", web::get().to(get_batch))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::post().to(create_batch))
                    .route("/{id}", web::put().to(update_batch))
                    .route("/{id}", web::patch().to(update_batch))
                    .route("/{id}", web::delete().to(delete_batch)),
            ),
    );
}
