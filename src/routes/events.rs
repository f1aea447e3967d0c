use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, guard, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::events::requests::{CreateEventRequest, EventListParams, UpdateEventRequest};
use crate::models::users::entities::UserRole;
use crate::services::EventService;
use crate::utils::SafeIDI64;

// 懒加载的全局 EventService 实例
static EVENT_SERVICE: Lazy<EventService> = Lazy::new(EventService::new_lazy);

pub async fn list_events(
    req: HttpRequest,
    query: web::Query<EventListParams>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.list_events(query.into_inner(), &req).await
}

pub async fn get_event(req: HttpRequest, event_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.get_event(event_id.0, &req).await
}

pub async fn create_event(
    req: HttpRequest,
    data: web::Json<CreateEventRequest>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.create_event(data.into_inner(), &req).await
}

pub async fn update_event(
    req: HttpRequest,
    event_id: SafeIDI64,
    data: web::Json<UpdateEventRequest>,
) -> ActixResult<HttpResponse> {
    EVENT_SERVICE
        .update_event(event_id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_event(req: HttpRequest, event_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVENT_SERVICE.delete_event(event_id.0, &req).await
}

// 配置路由：读取无需登录（携带 token 时识别职员），写操作仅职员
pub fn configure_event_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/events")
            .service(
                web::scope("")
                    .guard(guard::Get())
                    .wrap(middlewares::OptionalJWT)
                    .route("", web::get().to(list_events))
                    .route("/{id}", web::get().to(get_event)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .service(
                        web::scope("")
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                            .route("", web::post().to(create_event))
                            .route("/{id}", web::put().to(update_event))
                            .route("/{id}", web::patch().to(update_event))
                            .route("/{id}", web::delete().to(delete_event)),
                    ),
            ),
    );
}
