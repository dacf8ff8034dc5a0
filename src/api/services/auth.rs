//! 登录接口与登录限流

use std::sync::Arc;

use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError,
};
use actix_web::dev::ServiceRequest;
use actix_web::{HttpResponse, web};
use governor::middleware::NoOpMiddleware;
use tracing::debug;

use crate::api::jwt::JwtService;
use crate::services::AuthService;
use crate::utils::ip::TrustedProxies;

use super::helpers::{error_from_linklytics, ok_response};
use super::types::{LoginRequest, LoginResponse, UserView};

/// 按客户端 IP 限流，只信任可信代理转发的地址
#[derive(Clone)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let peer = req.peer_addr().map(|addr| addr.to_string());
        let key = match req.app_data::<web::Data<Arc<TrustedProxies>>>() {
            Some(proxies) => proxies.resolve(peer.as_deref(), req.headers()),
            None => TrustedProxies::default().resolve(peer.as_deref(), req.headers()),
        };
        Ok(key.unwrap_or_else(|| "unknown".to_string()))
    }
}

pub type LoginRateLimit = GovernorConfig<LoginKeyExtractor, NoOpMiddleware>;

/// 登录限流：每秒补充 1 次，突发 5 次
///
/// 只在启动时构建一次，各 worker 克隆后共享同一个限流器状态
pub fn login_rate_limit() -> LoginRateLimit {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    config
}

pub async fn login(
    auth: web::Data<Arc<AuthService>>,
    jwt: web::Data<Arc<JwtService>>,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    let body = body.into_inner();

    let user = match auth.authenticate(&body.email, &body.password).await {
        Ok(user) => user,
        Err(e) => return error_from_linklytics(&e),
    };

    match jwt.generate_token(&user) {
        Ok(token) => ok_response(LoginResponse {
            token,
            user: UserView::from(&user),
        }),
        Err(e) => error_from_linklytics(&e.into()),
    }
}

pub fn auth_routes(rate_limit: &LoginRateLimit) -> actix_web::Scope {
    web::scope("/auth").route(
        "/login",
        web::post().to(login).wrap(Governor::new(rate_limit)),
    )
}
