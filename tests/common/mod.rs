//! In-memory collaborators for exercising the webhook pipeline end to end.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use epulsaku_webhook::AppState;
use epulsaku_webhook::domain::{NotificationRecord, Transaction, TransactionPatch};
use epulsaku_webhook::ports::{
    NotificationSink, ProviderCredentials, RepositoryError, RepositoryResult, SettingsStore,
    TransactionRepository,
};

#[derive(Default)]
pub struct MemoryRepository {
    rows: Mutex<HashMap<String, Transaction>>,
    pub fail_writes: bool,
}

impl MemoryRepository {
    pub fn with(transactions: Vec<Transaction>) -> Arc<Self> {
        let rows = transactions
            .into_iter()
            .map(|tx| (tx.ref_id.clone(), tx))
            .collect();
        Arc::new(Self {
            rows: Mutex::new(rows),
            fail_writes: false,
        })
    }

    pub fn snapshot(&self, ref_id: &str) -> Option<Transaction> {
        self.rows.lock().unwrap().get(ref_id).cloned()
    }
}

#[async_trait]
impl TransactionRepository for MemoryRepository {
    async fn insert(&self, tx: &Transaction) -> RepositoryResult<Transaction> {
        self.rows
            .lock()
            .unwrap()
            .insert(tx.ref_id.clone(), tx.clone());
        Ok(tx.clone())
    }

    async fn get_by_ref_id(&self, ref_id: &str) -> RepositoryResult<Option<Transaction>> {
        Ok(self.snapshot(ref_id))
    }

    async fn apply_patch(
        &self,
        ref_id: &str,
        patch: &TransactionPatch,
    ) -> RepositoryResult<Transaction> {
        if self.fail_writes {
            return Err(RepositoryError::Database("write refused".into()));
        }
        let mut rows = self.rows.lock().unwrap();
        let tx = rows
            .get_mut(ref_id)
            .ok_or_else(|| RepositoryError::Database("row vanished".into()))?;
        tx.status = patch.status;
        if let Some(sn) = &patch.serial_number {
            tx.serial_number = Some(sn.clone());
        }
        if let Some(reason) = &patch.failure_reason {
            tx.failure_reason = Some(reason.clone());
        }
        if let Some(trx_id) = &patch.provider_trx_id {
            tx.provider_trx_id = Some(trx_id.clone());
        }
        if let Some(price) = patch.cost_price {
            tx.cost_price = price;
        }
        tx.updated_at = chrono::Utc::now();
        Ok(tx.clone())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct StaticSettings {
    creds: HashMap<String, ProviderCredentials>,
}

impl StaticSettings {
    pub fn with(entries: Vec<(&str, ProviderCredentials)>) -> Arc<Self> {
        Arc::new(Self {
            creds: entries
                .into_iter()
                .map(|(provider, creds)| (provider.to_string(), creds))
                .collect(),
        })
    }
}

#[async_trait]
impl SettingsStore for StaticSettings {
    async fn provider_credentials(
        &self,
        provider: &str,
    ) -> RepositoryResult<Option<ProviderCredentials>> {
        Ok(self.creds.get(provider).cloned())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<NotificationRecord>>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send(&self, record: &NotificationRecord) {
        self.sent.lock().unwrap().push(record.clone());
    }
}

/// Sink whose every send fails internally, exercising the best-effort
/// contract.
pub struct FailingSink;

#[async_trait]
impl NotificationSink for FailingSink {
    async fn send(&self, record: &NotificationRecord) {
        tracing::warn!(ref_id = %record.ref_id, "simulated notification failure");
    }
}

pub fn app_state(
    repo: Arc<MemoryRepository>,
    settings: Arc<StaticSettings>,
    sink: Arc<dyn NotificationSink>,
) -> AppState {
    AppState {
        transactions: repo,
        settings,
        notifier: sink,
    }
}

pub fn pending_transaction(ref_id: &str) -> Transaction {
    Transaction::new(
        ref_id.into(),
        "Pulsa Telkomsel 10k".into(),
        "08123456789".into(),
        9_800,
        10_500,
        "admin".into(),
    )
}
