//! Built-in bot commands

pub mod info;
pub mod inn;
pub mod last;
pub mod start;

pub use info::{contact_text, StaticReply, HELP_TEXT};
pub use inn::InnCommand;
pub use last::LastCommand;
pub use start::StartCommand;

use crate::application::errors::CommandError;
use crate::application::services::{CommandRouter, LookupService};
use crate::domain::entities::Command;
use crate::infrastructure::config::OperatorConfig;

/// Registers `/start`, `/help`, `/hello`, `/inn` and `/last`.
pub fn register_defaults(
    router: &mut CommandRouter,
    lookup: LookupService,
    operator: &OperatorConfig,
) -> Result<(), CommandError> {
    router.register(
        Command::new("/start", StartCommand).with_description("Начало работы с ботом"),
    )?;

    router.register(
        Command::new("/help", StaticReply::new(HELP_TEXT))
            .with_description("Показать справку по командам"),
    )?;

    router.register(
        Command::new("/hello", StaticReply::new(contact_text(operator)))
            .with_description("Информация о разработчике"),
    )?;

    router.register(
        Command::new("/inn", InnCommand::new(lookup))
            .with_description("Поиск компаний по ИНН"),
    )?;

    router.register(
        Command::new("/last", LastCommand).with_description("Повторить последнее действие бота"),
    )?;

    Ok(())
}
