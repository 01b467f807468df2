//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: Last-message cache
//! - Adapters: Platform integrations (Telegram, console)
//! - Registry: Company registry clients (Dadata)

pub mod adapters;
pub mod config;
pub mod registry;
pub mod storage;
