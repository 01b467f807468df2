//! Configuration management

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub dadata: DadataConfig,
    pub operator: OperatorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    /// Longest message the platform accepts, in characters
    pub max_message_length: usize,
    /// Pause between chunks of one long reply
    pub page_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub api_base: String,
    pub poll_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DadataConfig {
    pub token: Option<String>,
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Contact details shown by `/hello`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OperatorConfig {
    pub name: Option<String>,
    pub email: Option<String>,
    pub github: Option<String>,
    pub resume: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "inn-bot".to_string(),
            max_message_length: 4096,
            page_delay_ms: 300,
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: "https://api.telegram.org".to_string(),
            poll_timeout_seconds: 30,
        }
    }
}

impl Default for DadataConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: "https://suggestions.dadata.ru/suggestions/api/4_1/rs".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl BotConfig {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl DadataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Config file when it exists, defaults otherwise; environment applied on top.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            tracing::info!("Config file {} not found, using defaults", path.display());
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overrides fields from environment variables, read through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let first = |keys: &[&str]| keys.iter().find_map(|k| var(k)).filter(|v| !v.trim().is_empty());

        if let Some(token) = first(&["TELEGRAM_TOKEN", "Telegram__Token"]) {
            self.telegram.token = Some(token);
        }
        if let Some(token) = first(&["DADATA_TOKEN", "Dadata__Token"]) {
            self.dadata.token = Some(token);
        }
        if let Some(value) = first(&["BOT_MAX_MESSAGE_LENGTH"]) {
            self.bot.max_message_length = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("BOT_MAX_MESSAGE_LENGTH={}", value)))?;
        }
        if let Some(value) = first(&["BOT_PAGE_DELAY_MS"]) {
            self.bot.page_delay_ms = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("BOT_PAGE_DELAY_MS={}", value)))?;
        }
        Ok(())
    }

    /// Checks everything needed to serve lookups.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot.max_message_length == 0 {
            return Err(ConfigError::InvalidValue("bot.max-message-length must be positive".to_string()));
        }
        if self.dadata.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            return Err(ConfigError::MissingField("dadata.token".to_string()));
        }
        if let Some(token) = &self.telegram.token {
            validate_telegram_token(token)?;
        }
        Ok(())
    }
}

/// Telegram tokens look like `123456789:AA...`; real ones are at least 46 characters.
pub fn validate_telegram_token(token: &str) -> Result<(), ConfigError> {
    let shape = Regex::new(r"^\d+:[A-Za-z0-9_-]+$")
        .map_err(|e| ConfigError::Parse(e.to_string()))?;

    if token.len() < 46 || !shape.is_match(token) {
        return Err(ConfigError::InvalidValue("Invalid Telegram token format".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TOKEN: &str = "123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsawA-bc";

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bot.max_message_length, 4096);
        assert_eq!(config.bot.page_delay(), Duration::from_millis(300));
        assert_eq!(config.telegram.poll_timeout_seconds, 30);
        assert!(config.dadata.base_url.ends_with("/4_1/rs"));
        assert!(config.telegram.token.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "dadata:\n  token: secret\nbot:\n  page-delay-ms: 50\noperator:\n  name: Ops\n",
        )
        .unwrap();
        assert_eq!(config.dadata.token.as_deref(), Some("secret"));
        assert_eq!(config.bot.page_delay_ms, 50);
        assert_eq!(config.bot.max_message_length, 4096);
        assert_eq!(config.operator.name.as_deref(), Some("Ops"));
        assert_eq!(config.telegram.api_base, "https://api.telegram.org");
    }

    #[test]
    fn test_bad_yaml_is_parse_error() {
        assert!(matches!(Config::from_yaml("bot: [unclosed"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("Telegram__Token", TOKEN),
            ("DADATA_TOKEN", "dd-token"),
            ("BOT_PAGE_DELAY_MS", "0"),
        ]);
        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.telegram.token.as_deref(), Some(TOKEN));
        assert_eq!(config.dadata.token.as_deref(), Some("dd-token"));
        assert_eq!(config.bot.page_delay_ms, 0);
    }

    #[test]
    fn test_env_rejects_non_numeric_length() {
        let mut config = Config::default();
        let result = config.apply_env(|k| (k == "BOT_MAX_MESSAGE_LENGTH").then(|| "lots".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_validate_requires_dadata_token() {
        let config = Config::default();
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingField("dadata.token".to_string()))
        );
    }

    #[test]
    fn test_validate_checks_telegram_token_shape() {
        let mut config = Config::default();
        config.dadata.token = Some("dd".to_string());
        assert!(config.validate().is_ok());

        config.telegram.token = Some("not-a-token".to_string());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

        config.telegram.token = Some(TOKEN.to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_telegram_token_rules() {
        assert!(validate_telegram_token(TOKEN).is_ok());
        assert!(validate_telegram_token("123:short").is_err());
        assert!(validate_telegram_token(&TOKEN.replace(':', "")).is_err());
        assert!(validate_telegram_token(&format!("{} ", TOKEN)).is_err());
    }
}
