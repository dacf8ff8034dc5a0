//! Linklytics - short links with click analytics
//!
//! Owner-scoped short links, 302/410/404 resolution and per-link click
//! breakdowns by day, device and browser.
//!
//! # Architecture
//! - `storage`: SeaORM persistence (links, users, click events)
//! - `analytics`: user-agent classification, buffered click recording, retention
//! - `services`: link creation/resolution, analytics reports, user accounts
//! - `api`: HTTP handlers, JWT auth and route wiring
//! - `interfaces`: CLI commands
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and server mode
//! - `system`: Logging

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
