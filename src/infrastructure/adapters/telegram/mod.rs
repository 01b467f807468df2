//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::entities::{self, CommandRegistry};
use crate::domain::traits::{Bot, BotInfo, ParseMode};

/// Telegram API base URL
pub const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// Text messages only; stickers, photos and service updates are dropped.
    pub fn into_message(self) -> Option<entities::Message> {
        let message = self.message?;
        let text = message.text?;
        let sender = message.from.map(|u| {
            let user = entities::User::new(u.id).with_name(u.first_name, u.last_name);
            match u.username {
                Some(username) => user.with_username(username),
                None => user,
            }
        });

        Some(
            entities::Message::new(message.chat.id, text)
                .with_sender_opt(sender)
                .with_platform("telegram"),
        )
    }
}

/// Envelope of every Bot API response
#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    api_base: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: API_BASE.to_string(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "inn-bot".to_string(),
                username: "inn_bot".to_string(),
            },
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.token, method)
    }

    async fn call<Req: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: &str,
        request: &Req,
    ) -> Result<T, BotError> {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        decode_response(status.as_u16(), &body)
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: Option<String>,
        }

        #[derive(Serialize)]
        struct Empty {}

        let me: BotInfoResponse = self.call("getMe", &Empty {}).await?;
        self.info = BotInfo {
            id: me.id.to_string(),
            username: me.username.unwrap_or_else(|| me.first_name.clone()),
            name: me.first_name,
        };

        Ok(())
    }

    /// Long-poll for updates using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest<'a> {
            offset: i64,
            timeout: u64,
            allowed_updates: &'a [&'a str],
        }

        self.call(
            "getUpdates",
            &GetUpdatesRequest { offset, timeout, allowed_updates: &["message"] },
        )
        .await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .map_or(current, |next| next.max(current))
    }

    /// Send a message with specific parse mode
    pub async fn send_message_with_format(&self, chat_id: i64, text: &str, parse_mode: Option<&str>) -> Result<String, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: i64,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'a str>,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let sent: MessageResult = self
            .call("sendMessage", &SendMessageRequest { chat_id, text, parse_mode })
            .await?;

        Ok(sent.message_id.to_string())
    }

    /// Publish the registered commands in the client's command menu
    pub async fn register_commands(&self, registry: &CommandRegistry) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct BotCommand<'a> {
            command: &'a str,
            description: &'a str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest<'a> {
            commands: Vec<BotCommand<'a>>,
        }

        let commands = registry
            .all()
            .map(|c| BotCommand {
                command: c.name.trim_start_matches('/'),
                description: c.description.as_deref().unwrap_or(c.name.as_str()),
            })
            .collect();

        let _: bool = self.call("setMyCommands", &SetMyCommandsRequest { commands }).await?;

        tracing::info!("Registered {} bot commands with Telegram", registry.len());
        Ok(())
    }
}

fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, BotError> {
    let parsed: ApiResponse<T> = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) if !(200..300).contains(&status) => {
            return Err(BotError::Api { status, description: body.trim().to_string() });
        }
        Err(e) => return Err(BotError::Parse(e.to_string())),
    };

    if !parsed.ok {
        return Err(BotError::Api {
            status,
            description: parsed.description.unwrap_or_else(|| "no description".to_string()),
        });
    }

    parsed
        .result
        .ok_or_else(|| BotError::Parse("response has no result".to_string()))
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Telegram bot (token: {}...)", self.token.split(':').next().unwrap_or_default());
        Ok(())
    }

    async fn send_message(&self, chat_id: i64, text: &str, mode: ParseMode) -> Result<String, BotError> {
        match self.send_message_with_format(chat_id, text, mode.as_telegram()).await {
            Err(e) if mode != ParseMode::Plain && e.is_markup_rejected() => {
                tracing::warn!("Markup rejected, resending as plain text: {}", e);
                self.send_message_with_format(chat_id, text, None).await
            }
            other => other,
        }
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPDATES: &str = r#"{
        "ok": true,
        "result": [
            {
                "update_id": 100,
                "message": {
                    "message_id": 1,
                    "from": {"id": 42, "is_bot": false, "first_name": "Анна", "last_name": "Петрова", "username": "anna"},
                    "chat": {"id": 42, "type": "private"},
                    "date": 1700000000,
                    "text": "/inn 7707083893"
                }
            },
            {
                "update_id": 101,
                "message": {
                    "message_id": 2,
                    "chat": {"id": -5, "type": "group"},
                    "date": 1700000001,
                    "sticker": {"file_id": "x"}
                }
            },
            {"update_id": 102, "edited_message": {"message_id": 1, "chat": {"id": 42}, "date": 1}}
        ]
    }"#;

    #[test]
    fn test_decode_updates() {
        let updates: Vec<Update> = decode_response(200, UPDATES).unwrap();
        assert_eq!(updates.len(), 3);
        assert_eq!(TelegramAdapter::get_next_offset(&updates, 0), 103);
    }

    #[test]
    fn test_into_message_keeps_text_only() {
        let updates: Vec<Update> = decode_response(200, UPDATES).unwrap();
        let messages: Vec<_> = updates.into_iter().filter_map(Update::into_message).collect();

        assert_eq!(messages.len(), 1);
        let message = &messages[0];
        assert_eq!(message.chat_id, 42);
        assert_eq!(message.text, "/inn 7707083893");
        assert_eq!(message.platform, "telegram");

        let sender = message.sender.as_ref().unwrap();
        assert_eq!(sender.id, 42);
        assert_eq!(sender.username.as_deref(), Some("anna"));
        assert_eq!(sender.first_name.as_deref(), Some("Анна"));
    }

    #[test]
    fn test_next_offset_never_goes_back() {
        assert_eq!(TelegramAdapter::get_next_offset(&[], 57), 57);
    }

    #[test]
    fn test_decode_api_error() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: can't parse entities: Can't find end of the entity"}"#;
        let err = decode_response::<serde_json::Value>(400, body).unwrap_err();
        assert!(err.is_markup_rejected());
        assert!(!err.is_conflict());

        let body = r#"{"ok":false,"error_code":409,"description":"Conflict: terminated by other getUpdates request"}"#;
        let err = decode_response::<serde_json::Value>(409, body).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_decode_non_json_error() {
        let err = decode_response::<bool>(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, BotError::Api { status: 502, .. }));

        let err = decode_response::<bool>(200, "not json").unwrap_err();
        assert!(matches!(err, BotError::Parse(_)));
    }

    #[test]
    fn test_api_url() {
        let adapter = TelegramAdapter::new("123:abc").with_api_base("http://localhost:8081/");
        assert_eq!(adapter.api_url("getMe"), "http://localhost:8081/bot123:abc/getMe");
    }
}
