//! In-memory storage of the last message sent to each chat

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Last outbound text per chat.
///
/// One entry per chat id, overwritten on every send and kept for the life of
/// the process. Nothing is evicted or persisted.
#[derive(Debug, Default)]
pub struct LastMessageCache {
    messages: RwLock<HashMap<i64, String>>,
}

impl LastMessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, chat_id: i64, text: impl Into<String>) {
        let mut messages = self.messages.write().unwrap_or_else(PoisonError::into_inner);
        messages.insert(chat_id, text.into());
    }

    pub fn get(&self, chat_id: i64) -> Option<String> {
        let messages = self.messages.read().unwrap_or_else(PoisonError::into_inner);
        messages.get(&chat_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.messages.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
