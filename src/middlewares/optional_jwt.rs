//! 可选 JWT 认证中间件
//!
//! 携带有效 token 时写入当前用户，缺失或无效时按匿名请求继续处理。
//! 用于对登录与匿名用户返回不同内容的公开端点（如活动列表）。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::debug;

use super::require_jwt::{authenticate, bearer_token};

#[derive(Clone)]
pub struct OptionalJWT;

impl<S, B> Transform<S, ServiceRequest> for OptionalJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = OptionalJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OptionalJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct OptionalJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for OptionalJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
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
        Box::pin(async move {
            if bearer_token(&req).is_some() {
                match authenticate(&req).await {
                    Ok(user) => {
                        req.extensions_mut().insert(user);
                    }
                    Err(err) => {
                        debug!("Optional JWT ignored for {}: {}", req.path(), err);
                    }
                }
            }
            srv.call(req).await
        })
    }
}
