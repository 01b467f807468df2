//! Company data as returned by the registry and as shown to users

use chrono::NaiveDate;

/// Maximum number of characters kept from each free-text registry field.
pub const NAME_LIMIT: usize = 500;
pub const ADDRESS_LIMIT: usize = 300;
pub const MANAGEMENT_LIMIT: usize = 100;
pub const OKVED_LIMIT: usize = 50;

/// Lifecycle state of a registered company
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyStatus {
    Active,
    Liquidating,
    Liquidated,
    Bankrupt,
    Reorganizing,
    Other(String),
}

impl CompanyStatus {
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "ACTIVE" => CompanyStatus::Active,
            "LIQUIDATING" => CompanyStatus::Liquidating,
            "LIQUIDATED" => CompanyStatus::Liquidated,
            "BANKRUPT" => CompanyStatus::Bankrupt,
            "REORGANIZING" => CompanyStatus::Reorganizing,
            _ => CompanyStatus::Other(code.to_string()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CompanyStatus::Active => "Действующая",
            CompanyStatus::Liquidating => "Ликвидируется",
            CompanyStatus::Liquidated => "Ликвидирована",
            CompanyStatus::Bankrupt => "Банкротство",
            CompanyStatus::Reorganizing => "Реорганизация",
            CompanyStatus::Other(_) => "Неизвестный статус",
        }
    }
}

/// Best match for an INN, exactly as the registry reported it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyRecord {
    pub name: String,
    pub address: Option<String>,
    pub management: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub status: Option<CompanyStatus>,
    pub okved: Option<String>,
    pub capital: Option<f64>,
}

/// Display-ready company fields. Every optional field is either absent or non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyCard {
    pub name: String,
    pub address: Option<String>,
    pub management: Option<String>,
    pub registration_date: Option<String>,
    pub status_detail: Option<String>,
    pub okved: Option<String>,
    pub capital: Option<String>,
}

impl CompanyCard {
    pub fn from_record(record: CompanyRecord) -> Self {
        Self {
            name: truncate_chars(&record.name, NAME_LIMIT),
            address: non_blank(record.address).map(|s| truncate_chars(&s, ADDRESS_LIMIT)),
            management: non_blank(record.management).map(|s| truncate_chars(&s, MANAGEMENT_LIMIT)),
            registration_date: record
                .registration_date
                .map(|d| d.format("%d.%m.%Y").to_string()),
            status_detail: record.status.map(|s| s.label().to_string()),
            okved: non_blank(record.okved).map(|s| truncate_chars(&s, OKVED_LIMIT)),
            capital: record.capital.map(format_capital),
        }
    }
}

/// How the lookup of a single INN ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(CompanyCard),
    NotFound,
    /// The registry reported a failure; the message is safe to show to the user.
    UpstreamError(String),
    LocalError,
}

/// Result of looking up one valid INN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub inn: String,
    pub outcome: LookupOutcome,
}

impl LookupResult {
    pub fn new(inn: impl Into<String>, outcome: LookupOutcome) -> Self {
        Self {
            inn: inn.into(),
            outcome,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome, LookupOutcome::Found(_))
    }

    pub fn card(&self) -> Option<&CompanyCard> {
        match &self.outcome {
            LookupOutcome::Found(card) => Some(card),
            _ => None,
        }
    }
}

/// Keeps at most `max` characters; never splits a multi-byte character.
pub fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((idx, _)) => input[..idx].to_string(),
        None => input.to_string(),
    }
}

/// Formats an amount of roubles as `10 000,00 ₽` (non-breaking group separator).
pub fn format_capital(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let len = digits.len();

    let mut grouped = String::with_capacity(len + len / 3 * 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{},{:02} ₽", sign, grouped, cents % 100)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        let name = "Ромашка".repeat(100);
        let truncated = truncate_chars(&name, NAME_LIMIT);
        assert_eq!(truncated.chars().count(), NAME_LIMIT);
        assert_eq!(truncate_chars("ООО", 10), "ООО");
    }

    #[test]
    fn test_format_capital() {
        assert_eq!(format_capital(10000.0), "10\u{a0}000,00 ₽");
        assert_eq!(format_capital(1234567.891), "1\u{a0}234\u{a0}567,89 ₽");
        assert_eq!(format_capital(999.5), "999,50 ₽");
        assert_eq!(format_capital(0.0), "0,00 ₽");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(CompanyStatus::from_code("ACTIVE").label(), "Действующая");
        assert_eq!(CompanyStatus::from_code("bankrupt"), CompanyStatus::Bankrupt);
        assert_eq!(CompanyStatus::from_code("SUSPENDED").label(), "Неизвестный статус");
    }

    #[test]
    fn test_card_from_record_drops_blank_fields() {
        let record = CompanyRecord {
            name: "ПАО СБЕРБАНК".to_string(),
            address: Some("   ".to_string()),
            management: Some("Греф Герман Оскарович".to_string()),
            registration_date: NaiveDate::from_ymd_opt(1991, 6, 20),
            status: Some(CompanyStatus::Active),
            okved: Some(String::new()),
            capital: Some(67_760_844_000.0),
        };

        let card = CompanyCard::from_record(record);
        assert_eq!(card.address, None);
        assert_eq!(card.okved, None);
        assert_eq!(card.registration_date.as_deref(), Some("20.06.1991"));
        assert_eq!(card.status_detail.as_deref(), Some("Действующая"));
        assert_eq!(
            card.capital.as_deref(),
            Some("67\u{a0}760\u{a0}844\u{a0}000,00 ₽")
        );
    }

    #[test]
    fn test_card_truncates_long_fields() {
        let record = CompanyRecord {
            name: "Н".repeat(600),
            address: Some("А".repeat(400)),
            management: Some("Р".repeat(150)),
            okved: Some("6".repeat(80)),
            ..Default::default()
        };

        let card = CompanyCard::from_record(record);
        assert_eq!(card.name.chars().count(), NAME_LIMIT);
        assert_eq!(card.address.map(|s| s.chars().count()), Some(ADDRESS_LIMIT));
        assert_eq!(card.management.map(|s| s.chars().count()), Some(MANAGEMENT_LIMIT));
        assert_eq!(card.okved.map(|s| s.chars().count()), Some(OKVED_LIMIT));
    }
}
