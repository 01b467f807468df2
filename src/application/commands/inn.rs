//! `/inn` - batch company lookup

use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::messaging::{extract_inns, format_report};
use crate::application::services::LookupService;
use crate::domain::entities::{CommandContext, CommandHandler};
use crate::domain::traits::ParseMode;

/// Validates the INNs in the message, looks the valid ones up and sends the report
pub struct InnCommand {
    lookup: LookupService,
}

impl InnCommand {
    pub fn new(lookup: LookupService) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl CommandHandler for InnCommand {
    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), BotError> {
        let selection = extract_inns(&ctx.message.text);
        tracing::info!(
            "INN request: {} valid, {} invalid",
            selection.valid.len(),
            selection.invalid.len()
        );

        let results = if selection.valid.is_empty() {
            Vec::new()
        } else {
            match self.lookup.resolve_all(&selection.valid, ctx.outbox.shutdown()).await {
                Some(results) => results,
                None => return Ok(()),
            }
        };

        let report = format_report(&results, &selection.invalid);
        ctx.outbox.reply_paged(ctx.chat_id(), &report, ParseMode::Markdown).await
    }
}
