use async_trait::async_trait;

use crate::application::errors::RegistryError;
use crate::domain::entities::CompanyRecord;

/// Business registry lookup by taxpayer number
#[async_trait]
pub trait CompanyRegistry: Send + Sync {
    /// Best match for an already validated 10/12-digit INN, or `None` when nothing matches.
    async fn find_by_inn(&self, inn: &str) -> Result<Option<CompanyRecord>, RegistryError>;
}
