//! Resolves batches of INNs against the company registry

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::application::errors::RegistryError;
use crate::domain::entities::{CompanyCard, CompanyRecord, LookupOutcome, LookupResult};
use crate::domain::traits::CompanyRegistry;

/// Looks INNs up one at a time. A failed lookup only affects its own result.
#[derive(Clone)]
pub struct LookupService {
    registry: Arc<dyn CompanyRegistry>,
}

impl LookupService {
    pub fn new(registry: Arc<dyn CompanyRegistry>) -> Self {
        Self { registry }
    }

    /// One result per input INN, same order. `None` if shutdown was requested.
    pub async fn resolve_all(&self, inns: &[String], shutdown: &CancellationToken) -> Option<Vec<LookupResult>> {
        let mut results = Vec::with_capacity(inns.len());

        for inn in inns {
            let response = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    tracing::info!("Lookup interrupted by shutdown after {} of {}", results.len(), inns.len());
                    return None;
                }
                response = self.registry.find_by_inn(inn) => response,
            };
            results.push(LookupResult::new(inn.as_str(), classify(inn, response)));
        }

        Some(results)
    }
}

fn classify(inn: &str, response: Result<Option<CompanyRecord>, RegistryError>) -> LookupOutcome {
    match response {
        Ok(Some(record)) => LookupOutcome::Found(CompanyCard::from_record(record)),
        Ok(None) => {
            tracing::debug!("No company found for INN {}", inn);
            LookupOutcome::NotFound
        }
        Err(RegistryError::Upstream { status, message }) => {
            tracing::warn!("Registry rejected INN {} ({}): {}", inn, status, message);
            LookupOutcome::UpstreamError(message)
        }
        Err(e) => {
            tracing::error!("Lookup of INN {} failed: {}", inn, e);
            LookupOutcome::LocalError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::company::NAME_LIMIT;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedRegistry {
        answers: HashMap<String, Result<Option<CompanyRecord>, RegistryError>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRegistry {
        fn with(mut self, inn: &str, answer: Result<Option<CompanyRecord>, RegistryError>) -> Self {
            self.answers.insert(inn.to_string(), answer);
            self
        }
    }

    #[async_trait]
    impl CompanyRegistry for ScriptedRegistry {
        async fn find_by_inn(&self, inn: &str) -> Result<Option<CompanyRecord>, RegistryError> {
            self.calls.lock().unwrap().push(inn.to_string());
            self.answers.get(inn).cloned().unwrap_or(Ok(None))
        }
    }

    fn record(name: &str) -> CompanyRecord {
        CompanyRecord {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn inns(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_each_failure_is_isolated() {
        let registry = ScriptedRegistry::default()
            .with("1111111111", Ok(Some(record("ООО Первая"))))
            .with("2222222222", Err(RegistryError::Upstream { status: 429, message: "Too many requests".to_string() }))
            .with("3333333333", Err(RegistryError::Network("connection refused".to_string())))
            .with("4444444444", Ok(Some(record("ООО Четвёртая"))))
            .with("555555555555", Err(RegistryError::Parse("expected value".to_string())));
        let service = LookupService::new(Arc::new(registry));

        let input = inns(&["1111111111", "2222222222", "3333333333", "4444444444", "555555555555", "6666666666"]);
        let results = service.resolve_all(&input, &CancellationToken::new()).await.unwrap();

        let got: Vec<&str> = results.iter().map(|r| r.inn.as_str()).collect();
        assert_eq!(got, input.iter().map(|s| s.as_str()).collect::<Vec<_>>());

        assert_eq!(results[0].card().map(|c| c.name.as_str()), Some("ООО Первая"));
        assert_eq!(results[1].outcome, LookupOutcome::UpstreamError("Too many requests".to_string()));
        assert_eq!(results[2].outcome, LookupOutcome::LocalError);
        assert_eq!(results[3].card().map(|c| c.name.as_str()), Some("ООО Четвёртая"));
        assert_eq!(results[4].outcome, LookupOutcome::LocalError);
        assert_eq!(results[5].outcome, LookupOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_found_names_are_truncated() {
        let registry = ScriptedRegistry::default().with("1111111111", Ok(Some(record(&"Я".repeat(NAME_LIMIT + 20)))));
        let service = LookupService::new(Arc::new(registry));

        let results = service
            .resolve_all(&inns(&["1111111111"]), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(results[0].card().unwrap().name.chars().count(), NAME_LIMIT);
    }

    #[tokio::test]
    async fn test_lookups_run_in_request_order() {
        let registry = Arc::new(ScriptedRegistry::default());
        let service = LookupService::new(registry.clone());

        let input = inns(&["3333333333", "1111111111", "2222222222"]);
        service.resolve_all(&input, &CancellationToken::new()).await.unwrap();
        assert_eq!(*registry.calls.lock().unwrap(), input);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_performs_no_lookups() {
        let registry = Arc::new(ScriptedRegistry::default());
        let service = LookupService::new(registry.clone());
        let token = CancellationToken::new();
        token.cancel();

        let results = service.resolve_all(&inns(&["1111111111"]), &token).await;
        assert!(results.is_none());
        assert!(registry.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_gives_empty_results() {
        let service = LookupService::new(Arc::new(ScriptedRegistry::default()));
        let results = service.resolve_all(&[], &CancellationToken::new()).await;
        assert_eq!(results, Some(Vec::new()));
    }
}
