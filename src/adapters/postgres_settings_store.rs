//! Postgres implementation of SettingsStore. One row per provider; the
//! allow-list is stored as the admin-entered CSV string.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::ports::{ProviderCredentials, RepositoryError, RepositoryResult, SettingsStore};

#[derive(Clone)]
pub struct PostgresSettingsStore {
    pool: PgPool,
}

impl PostgresSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for PostgresSettingsStore {
    async fn provider_credentials(
        &self,
        provider: &str,
    ) -> RepositoryResult<Option<ProviderCredentials>> {
        let row = sqlx::query_as::<_, SettingsRow>(
            "SELECT identifier, api_key, ip_allow_list FROM provider_settings WHERE provider = $1",
        )
        .bind(provider)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from)?;

        // A row with blank secrets means the admin has not finished
        // configuring the provider; treat it the same as no row.
        Ok(row
            .filter(|r| !r.identifier.trim().is_empty() && !r.api_key.trim().is_empty())
            .map(SettingsRow::into_credentials))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SettingsRow {
    identifier: String,
    api_key: String,
    ip_allow_list: String,
}

impl SettingsRow {
    fn into_credentials(self) -> ProviderCredentials {
        ProviderCredentials {
            identifier: self.identifier,
            api_key: self.api_key,
            ip_allow_list: parse_allow_list(&self.ip_allow_list),
        }
    }
}

fn parse_allow_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
