pub mod auth;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod links;
pub mod redirect;
pub mod types;

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::web;

use crate::api::AppServices;
use crate::api::middleware::BearerAuth;

pub use auth::{LoginRateLimit, auth_routes, login_rate_limit};
pub use error_code::ErrorCode;
pub use health::health_routes;
pub use helpers::{error_from_linklytics, error_response};
pub use links::links_routes;
pub use redirect::redirect_routes;
pub use types::ApiResponse;

/// 对外短链前缀（shortUrl = 前缀 + "/" + shortCode）
#[derive(Debug, Clone)]
pub struct PublicBaseUrl(pub String);

/// JSON 请求体解析失败时同样返回 `{code, message}`
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let message = format!("Invalid request body: {}", err);
            let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
            InternalError::from_response(err, response).into()
        })
}

/// 注册应用状态与全部路由，短码重定向放在最后
pub fn configure_routes(cfg: &mut web::ServiceConfig, app: &AppServices) {
    cfg.app_data(web::Data::new(app.storage.clone()))
        .app_data(web::Data::new(app.links.clone()))
        .app_data(web::Data::new(app.analytics.clone()))
        .app_data(web::Data::new(app.auth.clone()))
        .app_data(web::Data::new(app.jwt.clone()))
        .app_data(web::Data::new(app.recorder.clone()))
        .app_data(web::Data::new(app.proxies.clone()))
        .app_data(web::Data::new(PublicBaseUrl(app.public_base_url.clone())))
        .app_data(json_config())
        .service(
            web::scope("/api").service(auth_routes(&app.login_rate_limit)).service(
                links_routes().wrap(BearerAuth::new(app.jwt.clone())),
            ),
        )
        .service(health_routes())
        .service(redirect_routes());
}
