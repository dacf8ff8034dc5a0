//! Service layer for business logic
//!
//! HTTP handlers 和 CLI 共用的业务逻辑。

mod analytics_service;
mod auth_service;
pub mod code_generator;
mod link_service;

pub use analytics_service::{AnalyticsService, parse_time_range};
pub use auth_service::{AuthService, normalize_email};
pub use code_generator::{CodeGenerator, RandomCodeGenerator, validate_custom_alias};
pub use link_service::{CreateLinkRequest, LinkService, LinkSettings, Resolution};
