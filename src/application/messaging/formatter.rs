//! Report text for `/inn` requests (Telegram legacy Markdown)

use crate::domain::entities::{CompanyCard, LookupOutcome, LookupResult};

pub const INN_USAGE_TEXT: &str = "\
*Использование команды /inn:*
Укажите один или несколько ИНН через пробел после команды.

_Примеры:_
`/inn 7707083893` - информация по одному ИНН
`/inn 7707083893 7719408167` - информация по нескольким ИНН

*Требования к ИНН:*
• Должен содержать только цифры
• Длина 10 знаков (для юр. лиц) или 12 знаков (для ИП)";

pub const NOTHING_RETRIEVED_TEXT: &str = "Не удалось получить информацию по указанным ИНН";

const INVALID_HEADER: &str = "⚠️ *Обнаружены невалидные ИНН:*";
const INVALID_RULE: &str = "ℹ️ ИНН должен содержать 10 или 12 цифр";
const FOUND_HEADER: &str = "🏢 *Найденные компании:*";
const PROBLEMS_HEADER: &str = "⚠️ *Проблемы с обработкой:*";
const NO_DATA: &str = "нет данных";

/// Builds the full reply for one request.
///
/// `results` are the lookups of the valid INNs in request order; `invalid` the
/// rejected tokens. Output is deterministic for the same input.
pub fn format_report(results: &[LookupResult], invalid: &[String]) -> String {
    let mut out = String::new();

    if !invalid.is_empty() {
        push_invalid_warning(&mut out, invalid);
    }

    if results.is_empty() {
        out.push_str(INN_USAGE_TEXT);
        return out;
    }

    let mut resolved: Vec<(&str, &CompanyCard)> = results
        .iter()
        .filter_map(|r| r.card().map(|card| (r.inn.as_str(), card)))
        .collect();

    if resolved.is_empty() {
        out.push_str(NOTHING_RETRIEVED_TEXT);
        return out;
    }

    // stable: equal names keep request order
    resolved.sort_by(|a, b| a.1.name.cmp(&b.1.name));

    out.push_str(FOUND_HEADER);
    out.push_str("\n\n");
    for (inn, card) in resolved {
        push_card(&mut out, inn, card);
    }

    let problems: Vec<&LookupResult> = results.iter().filter(|r| !r.is_resolved()).collect();
    if !problems.is_empty() {
        out.push_str(PROBLEMS_HEADER);
        out.push_str("\n\n");
        for problem in problems {
            push_problem(&mut out, problem);
        }
    }

    out.truncate(out.trim_end().len());
    out
}

fn push_invalid_warning(out: &mut String, invalid: &[String]) {
    out.push_str(INVALID_HEADER);
    out.push('\n');
    for token in invalid {
        out.push_str("- ");
        out.push_str(&escape_markdown(token));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(INVALID_RULE);
    out.push_str("\n\n");
}

fn push_card(out: &mut String, inn: &str, card: &CompanyCard) {
    out.push_str(&bold(&card.name));
    out.push('\n');
    out.push_str(&format!("*ИНН:* `{}`\n", inn));
    out.push_str(&format!(
        "*Статус:* {}\n",
        card.status_detail.as_deref().unwrap_or(NO_DATA)
    ));

    let optional = [
        ("Адрес", &card.address),
        ("Руководитель", &card.management),
        ("Дата регистрации", &card.registration_date),
        ("ОКВЭД", &card.okved),
        ("Уставный капитал", &card.capital),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            out.push_str(&format!("*{}:* {}\n", label, escape_markdown(value)));
        }
    }
    out.push('\n');
}

fn push_problem(out: &mut String, result: &LookupResult) {
    let summary = match &result.outcome {
        LookupOutcome::NotFound => "Компания не найдена",
        LookupOutcome::UpstreamError(_) => "Ошибка при запросе к внешнему сервису",
        LookupOutcome::LocalError => "Внутренняя ошибка сервера",
        LookupOutcome::Found(_) => return,
    };
    out.push_str(&format!("*ИНН {}:* {}\n", result.inn, summary));

    if let LookupOutcome::UpstreamError(reason) = &result.outcome {
        if !reason.trim().is_empty() {
            out.push_str(&format!("_Причина:_ {}\n", escape_markdown(reason)));
        }
    }
    out.push('\n');
}

/// Escapes the characters legacy Markdown treats as entity delimiters.
/// `*text*` when the text fits in a bold entity as is, otherwise the escaped
/// text without emphasis. Backslash escapes only work outside entities.
pub fn bold(text: &str) -> String {
    if text.contains('*') {
        escape_markdown(text)
    } else {
        format!("*{}*", text)
    }
}

pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
