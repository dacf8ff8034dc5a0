use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{Method, header::AUTHORIZATION},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::api::jwt::JwtService;
use crate::api::services::{ApiResponse, ErrorCode};

/// 已认证用户，由中间件放入请求 extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
}

/// Bearer token 认证中间件
#[derive(Clone)]
pub struct BearerAuth {
    jwt: Arc<JwtService>,
}

impl BearerAuth {
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self { jwt }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
            jwt: Arc::clone(&self.jwt),
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
    jwt: Arc<JwtService>,
}

impl<S> BearerAuthMiddleware<S> {
    fn extract_bearer_token(req: &ServiceRequest) -> Option<&str> {
        req.headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn handle_unauthorized<B>(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::Unauthorized()
                .json(ApiResponse::<()> {
                    code: ErrorCode::Unauthorized as i32,
                    message: "Unauthorized: invalid or missing token".to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
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

        // CORS 预检不带凭据
        if req.method() == Method::OPTIONS {
            return Box::pin(async move { srv.call(req).await.map(|r| r.map_into_left_body()) });
        }

        let claims = Self::extract_bearer_token(&req).map(|token| self.jwt.validate_token(token));

        Box::pin(async move {
            match claims {
                Some(Ok(claims)) => {
                    trace!("Bearer token accepted for user {}", claims.sub);
                    req.extensions_mut().insert(AuthenticatedUser {
                        id: claims.sub,
                        email: claims.email,
                    });
                    srv.call(req).await.map(|r| r.map_into_left_body())
                }
                Some(Err(e)) => {
                    debug!("Bearer token rejected: {}", e);
                    Ok(Self::handle_unauthorized(req))
                }
                None => {
                    debug!("Missing bearer token on {}", req.path());
                    Ok(Self::handle_unauthorized(req))
                }
            }
        })
    }
}
