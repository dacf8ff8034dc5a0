//! 链接管理与统计接口（需要 Bearer 认证）

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::api::middleware::AuthenticatedUser;
use crate::services::{AnalyticsService, CreateLinkRequest, LinkService, parse_time_range};

use super::PublicBaseUrl;
use super::helpers::{created_response, error_from_linklytics, ok_response};
use super::types::{AnalyticsQuery, AnalyticsResponse, CreateLinkBody, LinkView};

pub async fn create_link(
    user: web::ReqData<AuthenticatedUser>,
    links: web::Data<Arc<LinkService>>,
    base_url: web::Data<PublicBaseUrl>,
    body: web::Json<CreateLinkBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let req = CreateLinkRequest {
        original_url: body.original_url,
        custom_alias: body.custom_alias,
        expiration_days: body.expiration_days,
    };

    match links.create_link(&user.id, req).await {
        Ok(link) => created_response(LinkView::new(link, 0, &base_url.0, Utc::now())),
        Err(e) => error_from_linklytics(&e),
    }
}

pub async fn list_links(
    user: web::ReqData<AuthenticatedUser>,
    links: web::Data<Arc<LinkService>>,
    base_url: web::Data<PublicBaseUrl>,
) -> HttpResponse {
    match links.list_links(&user.id).await {
        Ok(items) => {
            let now = Utc::now();
            let views: Vec<LinkView> = items
                .into_iter()
                .map(|item| LinkView::new(item.link, item.total_clicks, &base_url.0, now))
                .collect();
            ok_response(views)
        }
        Err(e) => error_from_linklytics(&e),
    }
}

pub async fn link_analytics(
    user: web::ReqData<AuthenticatedUser>,
    path: web::Path<String>,
    query: web::Query<AnalyticsQuery>,
    links: web::Data<Arc<LinkService>>,
    analytics: web::Data<Arc<AnalyticsService>>,
    base_url: web::Data<PublicBaseUrl>,
) -> HttpResponse {
    let link_id = path.into_inner();

    let range = match parse_time_range(query.start.as_deref(), query.end.as_deref()) {
        Ok(range) => range,
        Err(e) => return error_from_linklytics(&e),
    };

    let link = match links.get_owned_link(&user.id, &link_id).await {
        Ok(link) => link,
        Err(e) => return error_from_linklytics(&e),
    };

    let report = match analytics.get_link_analytics(&link, &range).await {
        Ok(report) => report,
        Err(e) => return error_from_linklytics(&e),
    };

    let total_clicks = match links.total_clicks(&link.id).await {
        Ok(total) => total,
        Err(e) => return error_from_linklytics(&e),
    };

    ok_response(AnalyticsResponse {
        link: LinkView::new(link, total_clicks, &base_url.0, Utc::now()),
        analytics: report,
    })
}

pub fn links_routes() -> actix_web::Scope {
    web::scope("/links")
        .route("", web::post().to(create_link))
        .route("", web::get().to(list_links))
        .route("/{id}/analytics", web::get().to(link_analytics))
}
