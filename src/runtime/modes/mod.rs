//! Mode routing
//!
//! - Server mode (HTTP server, default)
//! - CLI mode (user and config management, see `interfaces::cli`)

pub mod server;

pub use server::run_server;
