use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::{BotError, CommandError};
use crate::application::services::Outbox;
use crate::domain::entities::Message;

/// Everything a handler gets for one invocation
pub struct CommandContext<'a> {
    pub message: &'a Message,
    pub outbox: &'a Outbox,
}

impl CommandContext<'_> {
    pub fn chat_id(&self) -> i64 {
        self.message.chat_id
    }
}

/// Command handler - one method, invoked with the full message text
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), BotError>;
}

/// Represents a bot command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub handler: Arc<dyn CommandHandler>,
}

impl Command {
    /// `name` includes the leading slash, e.g. `/inn`.
    pub fn new(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.into(),
            description: None,
            handler: Arc::new(handler),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Name to command table. Filled once at startup, read-only afterwards.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mut command: Command) -> Result<(), CommandError> {
        let name = command.name.to_lowercase();
        let valid = name.len() > 1
            && name.starts_with('/')
            && !name[1..].contains(|c: char| c.is_whitespace() || c == '/' || c == '@');
        if !valid {
            return Err(CommandError::InvalidName(command.name));
        }
        if self.index.contains_key(&name) {
            return Err(CommandError::Duplicate(name));
        }

        command.name = name.clone();
        self.index.insert(name, self.commands.len());
        self.commands.push(command);
        Ok(())
    }

    /// Exact lookup by case-folded name.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.index
            .get(&name.to_lowercase())
            .and_then(|&i| self.commands.get(i))
    }

    /// Commands in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
