//! INN lookup bot: Russian company registry lookups over Telegram

pub mod application;
pub mod domain;
pub mod infrastructure;
