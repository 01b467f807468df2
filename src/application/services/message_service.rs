//! Outbound side of a conversation: send, record, paginate

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::application::errors::BotError;
use crate::application::messaging::paginator::{paginate, TELEGRAM_MAX_MESSAGE_LENGTH};
use crate::domain::traits::{Bot, ParseMode};
use crate::infrastructure::storage::LastMessageCache;

/// Pause between consecutive chunks of one reply.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(300);

/// Sends replies through the platform adapter and records what was sent.
///
/// Every send and every inter-chunk pause gives way to the shutdown token;
/// once it fires nothing more is sent and the call returns `Ok`.
#[derive(Clone)]
pub struct Outbox {
    bot: Arc<dyn Bot>,
    last_messages: Arc<LastMessageCache>,
    shutdown: CancellationToken,
    page_delay: Duration,
    max_message_length: usize,
}

impl Outbox {
    pub fn new(bot: Arc<dyn Bot>, last_messages: Arc<LastMessageCache>, shutdown: CancellationToken) -> Self {
        Self {
            bot,
            last_messages,
            shutdown,
            page_delay: DEFAULT_PAGE_DELAY,
            max_message_length: TELEGRAM_MAX_MESSAGE_LENGTH,
        }
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn with_max_message_length(mut self, max: usize) -> Self {
        self.max_message_length = max;
        self
    }

    pub fn last_messages(&self) -> &LastMessageCache {
        &self.last_messages
    }

    pub fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Sends without touching the last-message record.
    pub async fn send(&self, chat_id: i64, text: &str, mode: ParseMode) -> Result<(), BotError> {
        self.deliver(chat_id, text, mode, false).await.map(|_| ())
    }

    /// Sends and records `text` as the chat's last message.
    pub async fn reply(&self, chat_id: i64, text: &str, mode: ParseMode) -> Result<(), BotError> {
        self.deliver(chat_id, text, mode, true).await.map(|_| ())
    }

    /// Sends `text` in line-safe chunks, recording each one as it goes out.
    pub async fn reply_paged(&self, chat_id: i64, text: &str, mode: ParseMode) -> Result<(), BotError> {
        let chunks: Vec<String> = paginate(text, self.max_message_length)
            .into_iter()
            .filter(|chunk| !chunk.trim().is_empty())
            .collect();

        tracing::debug!("Reply to {} split into {} chunk(s)", chat_id, chunks.len());

        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 && !self.pause().await {
                tracing::info!("Shutdown requested, {} chunk(s) to {} not sent", chunks.len() - i, chat_id);
                return Ok(());
            }
            if !self.deliver(chat_id, chunk, mode, true).await? {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Returns `false` when cancelled before the message went out.
    async fn deliver(&self, chat_id: i64, text: &str, mode: ParseMode, record: bool) -> Result<bool, BotError> {
        if self.shutdown.is_cancelled() {
            return Ok(false);
        }

        tracing::debug!("Sending to {}: {}", chat_id, preview(text));
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => return Ok(false),
            sent = self.bot.send_message(chat_id, text, mode) => { sent?; }
        }

        if record {
            self.last_messages.store(chat_id, text);
        }
        Ok(true)
    }

    async fn pause(&self) -> bool {
        if self.page_delay.is_zero() {
            return !self.shutdown.is_cancelled();
        }
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => false,
            _ = tokio::time::sleep(self.page_delay) => true,
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}
