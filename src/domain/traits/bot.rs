use async_trait::async_trait;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Prepare the adapter before messages flow
    async fn start(&self) -> Result<(), BotError>;

    /// Send a message to a chat, returning the platform message id
    async fn send_message(&self, chat_id: i64, text: &str, mode: ParseMode) -> Result<String, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// How the platform should interpret markup in outbound text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    Plain,
    Markdown,
}

impl ParseMode {
    /// Telegram `parse_mode` value; `None` for plain text.
    pub fn as_telegram(&self) -> Option<&'static str> {
        match self {
            ParseMode::Plain => None,
            ParseMode::Markdown => Some("Markdown"),
        }
    }
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
