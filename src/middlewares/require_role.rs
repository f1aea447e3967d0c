//! 按角色放行的中间件，挂在 RequireJWT 之内侧的 scope 上

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    /// 当前用户角色属于 `roles` 之一即放行
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed = self.allowed.clone();

        Box::pin(async move {
            // RequireJWT 已写入当前用户；缺失说明 scope 未挂认证
            let Some(user) = req.extensions().get::<User>().cloned() else {
                info!("Role gate reached without an authenticated user");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if allowed.contains(&user.role) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            info!(
                "User {} with role {:?} refused at {} (allowed: {:?})",
                user.id,
                user.role,
                req.path(),
                allowed
            );
            Ok(req.into_response(
                create_error_response(
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    "You do not have permission to perform this action.",
                )
                .map_into_right_body(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;
    use actix_web::{App, HttpResponse, test, web};

    fn user_with_role(role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id: 7,
            username: "gate".to_string(),
            email: "gate@example.com".to_string(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            address: String::new(),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn status_for(user: Option<User>) -> StatusCode {
        let app = test::init_service(
            App::new().service(
                web::scope("/staff")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()))
                    .wrap_fn(move |req, srv| {
                        if let Some(user) = user.clone() {
                            req.extensions_mut().insert(user);
                        }
                        srv.call(req)
                    })
                    .route("", web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/staff").to_request();
        test::call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn staff_and_admin_pass_the_staff_gate() {
        assert_eq!(status_for(Some(user_with_role(UserRole::Staff))).await, StatusCode::OK);
        assert_eq!(status_for(Some(user_with_role(UserRole::Admin))).await, StatusCode::OK);
    }

    #[actix_web::test]
    async fn students_are_forbidden_from_staff_scopes() {
        assert_eq!(
            status_for(Some(user_with_role(UserRole::Student))).await,
            StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn missing_user_is_unauthorized() {
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
    }
}
