//! Message dispatcher - Entry point for every inbound text message

use tracing::Instrument;

use crate::application::errors::BotError;
use crate::application::services::{CommandRouter, Outbox};
use crate::domain::entities::Message;
use crate::domain::traits::ParseMode;

pub const NOT_UNDERSTOOD_TEXT: &str =
    "Я не понимаю твое сообщение, чтобы узнать как пользоваться моим функционалом напиши /help";
pub const INTERNAL_ERROR_TEXT: &str = "⚠️ Произошла внутренняя ошибка. Попробуйте позже.";

/// Routes inbound messages: commands to the router, anything else gets a hint.
pub struct MessageDispatcher {
    router: CommandRouter,
    outbox: Outbox,
}

impl MessageDispatcher {
    pub fn new(router: CommandRouter, outbox: Outbox) -> Self {
        Self { router, outbox }
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Handles one message completely. Failures are logged, never returned.
    pub async fn handle(&self, message: Message) {
        let span = tracing::info_span!(
            "message",
            id = %message.id,
            chat_id = message.chat_id,
            platform = %message.platform,
            command = message.text.split_whitespace().next().filter(|_| message.is_command()).unwrap_or("-"),
        );

        async {
            tracing::info!(
                "Message: {} sent to chat {} by {}",
                message.text,
                message.chat_id,
                message.sender_name()
            );

            if let Err(e) = self.route(&message).await {
                tracing::error!("Failed to handle message: {}", e);
                if let Err(e) = self.outbox.send(message.chat_id, INTERNAL_ERROR_TEXT, ParseMode::Plain).await {
                    tracing::error!("Failed to report internal error to {}: {}", message.chat_id, e);
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn route(&self, message: &Message) -> Result<(), BotError> {
        if message.is_command() {
            self.router.dispatch(message, &self.outbox).await;
            return Ok(());
        }
        self.outbox
            .reply(message.chat_id, NOT_UNDERSTOOD_TEXT, ParseMode::Plain)
            .await
    }
}
