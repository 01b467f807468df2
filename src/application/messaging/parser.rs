//! Message parser - Command names and INN arguments out of raw text

/// At most this many valid INNs are looked up per request.
pub const MAX_INNS_PER_REQUEST: usize = 15;

/// Arguments of an `/inn` request split by validity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InnSelection {
    /// Valid INNs in original order, truncated to [`MAX_INNS_PER_REQUEST`].
    pub valid: Vec<String>,
    /// Every rejected token in original order.
    pub invalid: Vec<String>,
}

/// Parses incoming command text
#[derive(Debug, Clone, Default)]
pub struct MessageParser {
    bot_username: Option<String>,
}

impl MessageParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets `/cmd@this_bot` (group chat form) resolve to `/cmd`.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into().trim_start_matches('@').to_lowercase());
        self
    }

    /// First whitespace-delimited token, case-folded. `None` for blank text.
    pub fn command_name(&self, text: &str) -> Option<String> {
        let token = text.split_whitespace().next()?.to_lowercase();

        if let (Some(me), Some((name, addressee))) = (&self.bot_username, token.split_once('@')) {
            if addressee == me {
                return Some(name.to_string());
            }
        }
        Some(token)
    }
}

/// Valid iff exactly 10 or 12 characters, all ASCII digits.
pub fn is_valid_inn(token: &str) -> bool {
    matches!(token.len(), 10 | 12) && token.bytes().all(|b| b.is_ascii_digit())
}

/// Splits the arguments after the command into valid and invalid INNs.
pub fn extract_inns(text: &str) -> InnSelection {
    let mut selection = InnSelection::default();

    for token in text.split_whitespace().skip(1) {
        if is_valid_inn(token) {
            selection.valid.push(token.to_string());
        } else {
            selection.invalid.push(token.to_string());
        }
    }

    selection.valid.truncate(MAX_INNS_PER_REQUEST);
    selection
}
