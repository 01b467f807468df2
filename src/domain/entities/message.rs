use super::User;
use chrono::{DateTime, Utc};

/// Text message received from a conversation
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub chat_id: i64,
    pub sender: Option<User>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
}

impl Message {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            chat_id,
            sender: None,
            text: text.into(),
            timestamp: Utc::now(),
            platform: "unknown".to_string(),
        }
    }

    pub fn with_sender(mut self, user: User) -> Self {
        self.sender = Some(user);
        self
    }

    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        self.sender = user;
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn is_command(&self) -> bool {
        self.text.starts_with('/')
    }

    pub fn sender_name(&self) -> String {
        self.sender
            .as_ref()
            .map(|u| u.display_name())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
