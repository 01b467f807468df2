//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::application::errors::BotError;
use crate::domain::entities::{Message, User};
use crate::domain::traits::{Bot, BotInfo, ParseMode};

/// Chat id used for everything typed into the console
pub const CONSOLE_CHAT_ID: i64 = 0;

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "inn-bot".to_string(),
                username: "console".to_string(),
            },
        }
    }

    /// Line stream over stdin; each line becomes one inbound message.
    pub fn lines() -> Lines<BufReader<Stdin>> {
        BufReader::new(tokio::io::stdin()).lines()
    }

    /// Wraps a typed line as a message from the local operator.
    pub fn to_message(line: &str) -> Option<Message> {
        let text = line.trim();
        if text.is_empty() {
            return None;
        }
        Some(
            Message::new(CONSOLE_CHAT_ID, text)
                .with_sender(User::new(CONSOLE_CHAT_ID).with_username("console"))
                .with_platform("console"),
        )
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(())
    }

    async fn send_message(&self, _chat_id: i64, text: &str, _mode: ParseMode) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
