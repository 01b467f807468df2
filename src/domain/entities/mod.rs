//! Domain entities - Core business objects

pub mod user;
pub mod message;
pub mod command;
pub mod company;

pub use user::User;
pub use message::Message;
pub use command::{Command, CommandContext, CommandHandler, CommandRegistry};
pub use company::{CompanyCard, CompanyRecord, CompanyStatus, LookupOutcome, LookupResult};
