//! Server mode
//!
//! Starts the HTTP server with all routes and waits for a shutdown signal.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::{Method, header},
    middleware::{Compress, DefaultHeaders},
};
use anyhow::Result;
use tracing::warn;

use crate::api::configure_routes;
use crate::runtime::lifetime;

/// 预检缓存时间（秒）
const CORS_MAX_AGE: usize = 3600;

/// Build CORS middleware from `server.cors_allowed_origins`
fn build_cors_middleware(allowed_origins: &[String]) -> Cors {
    // 未配置来源时保持同源策略
    if allowed_origins.is_empty() {
        return Cors::default();
    }

    let mut cors = Cors::default();
    if allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(CORS_MAX_AGE)
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let services = startup.services;
    let recorder = services.recorder.clone();

    let config = crate::config::get_config();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let allowed_origins = config.server.cors_allowed_origins.clone();
    if services.proxies.is_empty() {
        warn!(
            "Client IP detection: auto-detect mode. \
             Connections from private IPs will use X-Forwarded-For. \
             To disable, configure server.trusted_proxies explicitly."
        );
    }

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&allowed_origins);

        App::new()
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add(("Keep-Alive", "timeout=30, max=1000")),
            )
            .configure(|cfg| configure_routes(cfg, &services))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(bind_address)?.run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&recorder) => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
