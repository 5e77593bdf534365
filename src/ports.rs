//! Trait seams between the webhook pipeline and its collaborators:
//! the transaction store, the admin settings store, and the messaging sink.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NotificationRecord, Transaction, TransactionPatch};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(String),

    #[error("corrupt record for {0}: {1}")]
    Corrupt(String, String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Database(err.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Store of resold transactions, keyed by the merchant-assigned `ref_id`.
/// `apply_patch` must be atomic per record; no cross-record transaction is
/// required by the pipeline.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn insert(&self, tx: &Transaction) -> RepositoryResult<Transaction>;

    async fn get_by_ref_id(&self, ref_id: &str) -> RepositoryResult<Option<Transaction>>;

    /// Applies a partial update to the record identified by `ref_id` and
    /// returns the updated row. `None` patch fields leave the stored value
    /// untouched.
    async fn apply_patch(
        &self,
        ref_id: &str,
        patch: &TransactionPatch,
    ) -> RepositoryResult<Transaction>;

    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> RepositoryResult<()>;
}

/// Secret material for one upstream provider, as configured by an admin.
/// Interpretation is provider-specific: Digiflazz uses `identifier` as the
/// buyer username and `api_key` as the API key; TokoVoucher uses
/// `identifier` as the member code and `api_key` as the secret key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub identifier: String,
    pub api_key: String,
    /// IP or CIDR entries. Empty list means the IP check is skipped.
    pub ip_allow_list: Vec<String>,
}

/// Admin-configurable settings. Credentials are read fresh on every webhook
/// delivery; callers must not cache them across requests.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn provider_credentials(
        &self,
        provider: &str,
    ) -> RepositoryResult<Option<ProviderCredentials>>;
}

/// Outbound messaging sink. `send` is best-effort: implementations log
/// failures internally and never propagate them to the caller.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, record: &NotificationRecord);
}
