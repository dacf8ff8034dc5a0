//! HTTP 接口：Dashboard REST API、短码重定向与健康检查

pub mod jwt;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use crate::analytics::ClickRecorder;
use crate::services::{AnalyticsService, AuthService, LinkService};
use crate::storage::SeaOrmStorage;
use crate::utils::ip::TrustedProxies;

pub use services::configure_routes;
use services::{LoginRateLimit, login_rate_limit};

/// 各 worker 共享的服务句柄
#[derive(Clone)]
pub struct AppServices {
    pub storage: Arc<SeaOrmStorage>,
    pub links: Arc<LinkService>,
    pub analytics: Arc<AnalyticsService>,
    pub auth: Arc<AuthService>,
    pub jwt: Arc<jwt::JwtService>,
    pub recorder: Arc<ClickRecorder>,
    pub proxies: Arc<TrustedProxies>,
    pub public_base_url: String,
    pub login_rate_limit: LoginRateLimit,
}

impl AppServices {
    /// 以同一个存储与点击记录器组装全部服务
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        links: LinkService,
        recorder: Arc<ClickRecorder>,
        jwt: jwt::JwtService,
        proxies: TrustedProxies,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            links: Arc::new(links.with_recorder(recorder.clone())),
            analytics: Arc::new(AnalyticsService::new(storage.clone(), Some(recorder.clone()))),
            auth: Arc::new(AuthService::new(storage.clone())),
            jwt: Arc::new(jwt),
            proxies: Arc::new(proxies),
            public_base_url: public_base_url.into(),
            login_rate_limit: login_rate_limit(),
            storage,
            recorder,
        }
    }

    pub fn from_config(storage: Arc<SeaOrmStorage>, recorder: Arc<ClickRecorder>) -> Self {
        let config = crate::config::get_config();
        Self::new(
            storage.clone(),
            LinkService::from_config(storage),
            recorder,
            jwt::JwtService::from_config(),
            TrustedProxies::from_config(),
            config.server.public_base_url.clone(),
        )
    }
}
