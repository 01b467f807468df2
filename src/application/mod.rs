//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Messaging: Parsing, report formatting, pagination, dispatching
//! - Services: Command routing, registry lookups, outbound delivery
//! - Commands: The handlers behind /start, /help, /hello, /inn and /last

pub mod commands;
pub mod errors;
pub mod messaging;
pub mod services;
