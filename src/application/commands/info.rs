//! Commands that answer with fixed text

use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::messaging::formatter::escape_markdown;
use crate::domain::entities::{CommandContext, CommandHandler};
use crate::domain::traits::ParseMode;
use crate::infrastructure::config::OperatorConfig;

pub const HELP_TEXT: &str = "\
🌟 *Доступные команды:*

• /start — Начало работы с ботом
• /help — Показать справку по командам
• /hello — Информация о разработчике
• /inn — Поиск компаний по ИНН
• /last — Повторить последнее действие бота

🔍 *Функционал поиска по ИНН:*
- Поиск по любому ИНН российской организации
- Отображение полного наименования компании
- Юридический адрес организации

💡 *Пример использования:*
Отправьте команду в формате:
`/inn 7735211265` или `/inn 7735211265 7735211272` для нескольких

_Бот работает на основе открытых данных ФНС России_";

pub const NO_CONTACT_TEXT: &str = "Контактная информация не указана.";

/// Replies with the same Markdown text every time
pub struct StaticReply {
    text: String,
}

impl StaticReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl CommandHandler for StaticReply {
    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), BotError> {
        ctx.outbox.reply(ctx.chat_id(), &self.text, ParseMode::Markdown).await
    }
}

/// Renders the `/hello` card from whatever contact fields are configured.
pub fn contact_text(operator: &OperatorConfig) -> String {
    let mut lines = Vec::new();

    if let Some(name) = &operator.name {
        lines.push(format!("• *Имя:* {}", escape_markdown(name)));
    }
    if let Some(email) = &operator.email {
        lines.push(format!("• *Email:* {}", link(email, &format!("mailto:{}", email))));
    }
    if let Some(github) = &operator.github {
        lines.push(format!(
            "• *GitHub:* {}",
            link(github, &format!("https://github.com/{}", github))
        ));
    }
    if let Some(resume) = &operator.resume {
        lines.push(format!("• *Резюме:* [ссылка]({})", resume));
    }

    if lines.is_empty() {
        return NO_CONTACT_TEXT.to_string();
    }

    format!(
        "👨‍💻 *Контактная информация:*\n\n{}\n\n_Всегда открыт для сотрудничества!_",
        lines.join("\n")
    )
}

/// Link label is an entity too, so it is left unescaped unless it would end early.
fn link(label: &str, url: &str) -> String {
    if label.contains(']') {
        format!("{} ({})", escape_markdown(label), url)
    } else {
        format!("[{}]({})", label, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_text_lists_configured_fields_only() {
        let operator = OperatorConfig {
            name: Some("Operator".to_string()),
            email: Some("ops@example.com".to_string()),
            github: None,
            resume: None,
        };
        let text = contact_text(&operator);
        assert!(text.contains("• *Имя:* Operator"));
        assert!(text.contains("[ops@example.com](mailto:ops@example.com)"));
        assert!(!text.contains("GitHub"));
    }

    #[test]
    fn test_contact_text_without_fields() {
        assert_eq!(contact_text(&OperatorConfig::default()), NO_CONTACT_TEXT);
    }

    #[test]
    fn test_github_handle_kept_literal_in_label() {
        let operator = OperatorConfig {
            github: Some("some_user".to_string()),
            ..Default::default()
        };
        assert!(contact_text(&operator).contains("[some_user](https://github.com/some_user)"));
    }
}
