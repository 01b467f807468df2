use crate::application::errors::CommandError;
use crate::application::messaging::parser::MessageParser;
use crate::domain::entities::{Command, CommandContext, CommandRegistry, Message};
use crate::domain::traits::ParseMode;

use super::Outbox;

pub const UNKNOWN_COMMAND_TEXT: &str = "Неизвестная команда";
pub const UNEXPECTED_ERROR_TEXT: &str = "⚠️ Произошла непредвиденная ошибка. Пожалуйста, попробуйте позже.";

/// Routes command messages to their registered handlers
pub struct CommandRouter {
    registry: CommandRegistry,
    parser: MessageParser,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self {
            registry: CommandRegistry::new(),
            parser: MessageParser::new(),
        }
    }

    pub fn with_parser(mut self, parser: MessageParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn register(&mut self, command: Command) -> Result<(), CommandError> {
        self.registry.register(command)
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Runs the handler named by the first token of the message.
    ///
    /// Never fails: unknown names get a fixed reply, and a handler error is
    /// logged and answered with a generic apology. If the apology cannot be
    /// sent either, that is logged and dropped.
    pub async fn dispatch(&self, message: &Message, outbox: &Outbox) {
        let chat_id = message.chat_id;
        let command = self
            .parser
            .command_name(&message.text)
            .and_then(|name| self.registry.get(&name));

        let Some(command) = command else {
            tracing::info!("Unknown command from {}: {}", chat_id, message.text);
            if let Err(e) = outbox.reply(chat_id, UNKNOWN_COMMAND_TEXT, ParseMode::Plain).await {
                tracing::error!("Failed to send unknown-command reply to {}: {}", chat_id, e);
            }
            return;
        };

        tracing::debug!("Dispatching {} for chat {}", command.name, chat_id);
        let ctx = CommandContext { message, outbox };
        if let Err(e) = command.handler.execute(&ctx).await {
            tracing::error!("Command {} failed for chat {}: {}", command.name, chat_id, e);
            if let Err(e) = outbox.reply(chat_id, UNEXPECTED_ERROR_TEXT, ParseMode::Markdown).await {
                tracing::error!("Failed to send error notice to {}: {}", chat_id, e);
            }
        }
    }
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new()
    }
}
