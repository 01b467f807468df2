//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Telegram API error ({status}): {description}")]
    Api { status: u16, description: String },

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BotError {
    /// Telegram answers 409 when another process is already polling with the same token.
    pub fn is_conflict(&self) -> bool {
        matches!(self, BotError::Api { status: 409, .. })
    }

    /// Telegram could not parse the entities of a formatted message.
    pub fn is_markup_rejected(&self) -> bool {
        match self {
            BotError::Api { status: 400, description } => {
                description.contains("can't parse entities")
            }
            _ => false,
        }
    }
}

/// Command registration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command already registered: {0}")]
    Duplicate(String),

    #[error("Invalid command name: {0}")]
    InvalidName(String),
}

/// Company registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry answered, but with an error response.
    #[error("Registry responded {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Configuration errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
