//! Application services - Business logic orchestration

pub mod command_service;
pub mod lookup_service;
pub mod message_service;

pub use command_service::CommandRouter;
pub use lookup_service::LookupService;
pub use message_service::Outbox;
