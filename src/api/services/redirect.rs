use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, LOCATION, USER_AGENT};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, trace};

use crate::analytics::ClickRecorder;
use crate::services::{LinkService, Resolution};
use crate::utils::ip::{TrustedProxies, extract_client_ip};

use super::error_code::ErrorCode;
use super::helpers::{error_from_linklytics, error_response};

pub async fn handle_redirect(
    req: HttpRequest,
    path: web::Path<String>,
    links: web::Data<Arc<LinkService>>,
    recorder: web::Data<Arc<ClickRecorder>>,
    proxies: web::Data<Arc<TrustedProxies>>,
) -> HttpResponse {
    let code = path.into_inner();

    match links.resolve(&code).await {
        Ok(Resolution::Active(link)) => {
            let user_agent = req.headers().get(USER_AGENT).and_then(|h| h.to_str().ok());
            let client_ip = extract_client_ip(&req, &proxies);
            recorder.record_visit(&link.id, user_agent, client_ip.as_deref());

            trace!("Redirect {} -> {}", link.short_code, link.original_url);
            HttpResponse::Found()
                .insert_header((LOCATION, link.original_url))
                .insert_header((CACHE_CONTROL, "no-store"))
                .finish()
        }
        Ok(Resolution::Expired(link)) => {
            debug!("Expired link requested: {}", link.short_code);
            let mut resp =
                error_response(StatusCode::GONE, ErrorCode::LinkExpired, "This link has expired");
            resp.headers_mut().insert(
                CACHE_CONTROL,
                actix_web::http::header::HeaderValue::from_static("no-store"),
            );
            resp
        }
        Ok(Resolution::NotFound) => {
            error_response(StatusCode::NOT_FOUND, ErrorCode::LinkNotFound, "Link not found")
        }
        Err(e) => error_from_linklytics(&e),
    }
}

/// 必须最后注册，避免吞掉 /api 与 /health
pub fn redirect_routes() -> actix_web::Resource {
    web::resource("/{code}").route(web::get().to(handle_redirect))
}
