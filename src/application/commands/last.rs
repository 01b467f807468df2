use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::{CommandContext, CommandHandler};
use crate::domain::traits::ParseMode;

pub const NOTHING_TO_REPEAT_TEXT: &str = "⚠️ Нет сохраненных сообщений для повторения";

/// `/last` - sends the chat's last recorded message again
pub struct LastCommand;

#[async_trait]
impl CommandHandler for LastCommand {
    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), BotError> {
        let chat_id = ctx.chat_id();
        match ctx.outbox.last_messages().get(chat_id) {
            Some(text) => ctx.outbox.reply(chat_id, &text, ParseMode::Markdown).await,
            // not recorded, so a second /last still has nothing to repeat
            None => ctx.outbox.send(chat_id, NOTHING_TO_REPEAT_TEXT, ParseMode::Plain).await,
        }
    }
}
