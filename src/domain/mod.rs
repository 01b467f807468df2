//! Domain layer - Core business types
//!
//! This layer contains:
//! - Entities: Core business objects (User, Message, Command, LookupResult)
//! - Traits: Abstractions for infrastructure (Bot, CompanyRegistry)

pub mod entities;
pub mod traits;
