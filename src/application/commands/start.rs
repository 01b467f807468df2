use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::application::messaging::formatter::bold;
use crate::domain::entities::{CommandContext, CommandHandler};
use crate::domain::traits::ParseMode;

/// `/start` - greeting and a short how-to
pub struct StartCommand;

impl StartCommand {
    pub fn greeting(first_name: Option<&str>) -> String {
        let welcome = match first_name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => format!("👋 {}", bold(&format!("Добро пожаловать, {}!", name))),
            None => "👋 *Добро пожаловать!*".to_string(),
        };

        format!(
            "{}

Я — ваш помощник для получения информации о компаниях по ИНН.

🚀 *Основные возможности:*
- Мгновенный поиск данных по ИНН
- Простая работа через Telegram

🔎 *Как начать поиск:*
Просто отправьте команду:
`/inn [ваш_ИНН]`

Например:
`/inn 7735211265` или `/inn 7735211265 7735211272` для нескольких

📌 Для просмотра всех команд используйте /help

_Данные предоставляются на основе открытых источников_",
            welcome
        )
    }
}

#[async_trait]
impl CommandHandler for StartCommand {
    async fn execute(&self, ctx: &CommandContext<'_>) -> Result<(), BotError> {
        let first_name = ctx.message.sender.as_ref().and_then(|u| u.first_name.as_deref());
        let text = Self::greeting(first_name);
        ctx.outbox.reply(ctx.chat_id(), &text, ParseMode::Markdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_uses_first_name() {
        assert!(StartCommand::greeting(Some("Анна")).starts_with("👋 *Добро пожаловать, Анна!*"));
    }

    #[test]
    fn test_greeting_keeps_markup_in_name_literal() {
        assert!(StartCommand::greeting(Some("anna_k")).starts_with("👋 *Добро пожаловать, anna_k!*"));
        assert!(StartCommand::greeting(Some("*star*")).starts_with("👋 Добро пожаловать, \\*star\\*!\n"));
    }

    #[test]
    fn test_greeting_without_name() {
        assert!(StartCommand::greeting(None).starts_with("👋 *Добро пожаловать!*"));
        assert!(StartCommand::greeting(Some("  ")).starts_with("👋 *Добро пожаловать!*"));
    }
}
