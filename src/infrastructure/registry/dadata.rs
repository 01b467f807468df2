//! Dadata party lookup - `findById/party`

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::errors::RegistryError;
use crate::domain::entities::{CompanyRecord, CompanyStatus};
use crate::domain::traits::CompanyRegistry;
use crate::infrastructure::config::DadataConfig;

/// Dadata suggestions API client
pub struct DadataClient {
    token: String,
    base_url: String,
    client: Client,
}

impl DadataClient {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        Ok(Self {
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &DadataConfig) -> Result<Self, RegistryError> {
        Self::new(
            config.token.clone().unwrap_or_default(),
            config.base_url.clone(),
            config.timeout(),
        )
    }

    fn party_url(&self) -> String {
        format!("{}/findById/party", self.base_url)
    }
}

/// API request structure
#[derive(Serialize)]
struct FindRequest<'a> {
    query: &'a str,
    count: u32,
}

#[derive(Deserialize, Debug, Default)]
struct FindResponse {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

#[derive(Deserialize, Debug)]
struct Suggestion {
    value: String,
    #[serde(default)]
    data: PartyData,
}

#[derive(Deserialize, Debug, Default)]
struct PartyData {
    address: Option<Address>,
    management: Option<Management>,
    state: Option<PartyState>,
    okved: Option<String>,
    capital: Option<Capital>,
}

#[derive(Deserialize, Debug)]
struct Address {
    value: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Management {
    name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct PartyState {
    status: Option<String>,
    /// Milliseconds since the Unix epoch
    registration_date: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct Capital {
    value: Option<f64>,
}

/// Error body, e.g. `{"family":"CLIENT_ERROR","reason":"Forbidden","message":"..."}`
#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    message: Option<String>,
    reason: Option<String>,
    detail: Option<String>,
}

#[async_trait]
impl CompanyRegistry for DadataClient {
    async fn find_by_inn(&self, inn: &str) -> Result<Option<CompanyRecord>, RegistryError> {
        let response = self.client
            .post(self.party_url())
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .json(&FindRequest { query: inn, count: 1 })
            .send()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::Upstream {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            });
        }

        let data: FindResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::Parse(e.to_string()))?;

        Ok(best_match(data))
    }
}

fn best_match(response: FindResponse) -> Option<CompanyRecord> {
    let suggestion = response.suggestions.into_iter().next()?;
    let data = suggestion.data;
    let state = data.state;

    Some(CompanyRecord {
        name: suggestion.value,
        address: data.address.and_then(|a| a.value),
        management: data.management.and_then(|m| m.name),
        registration_date: state
            .as_ref()
            .and_then(|s| s.registration_date)
            .and_then(date_from_millis),
        // a state block without a code still renders as an unknown status
        status: state.as_ref().map(|s| match s.status.as_deref() {
            Some(code) => CompanyStatus::from_code(code),
            None => CompanyStatus::Other(String::new()),
        }),
        okved: data.okved,
        capital: data.capital.and_then(|c| c.value),
    })
}

fn date_from_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

fn error_message(body: &str, fallback: Option<&str>) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .message
        .or(parsed.detail)
        .or(parsed.reason)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| fallback.map(str::to_string))
        .unwrap_or_else(|| "unknown error".to_string())
}
