//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod registry;

pub use bot::{Bot, BotInfo, ParseMode};
pub use registry::CompanyRegistry;
