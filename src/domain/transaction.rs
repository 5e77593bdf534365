//! Transaction domain entity.
//! Framework-agnostic representation of a resold PPOB transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reconciliation status of a transaction. `Sukses` and `Gagal` are
/// terminal: the webhook pipeline never transitions out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Sukses,
    Gagal,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Sukses | TransactionStatus::Gagal)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Sukses => "Sukses",
            TransactionStatus::Gagal => "Gagal",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => Some(TransactionStatus::Pending),
            "sukses" => Some(TransactionStatus::Sukses),
            "gagal" => Some(TransactionStatus::Gagal),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain entity representing one resold transaction. Created `Pending` by
/// the order-placement flow; mutated only by the webhook reconciler.
/// Prices are rupiah amounts, always integral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub ref_id: String,
    pub product_name: String,
    pub details: String,
    pub cost_price: i64,
    pub selling_price: i64,
    pub status: TransactionStatus,
    pub serial_number: Option<String>,
    pub failure_reason: Option<String>,
    pub provider_trx_id: Option<String>,
    pub initiated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        ref_id: String,
        product_name: String,
        details: String,
        cost_price: i64,
        selling_price: i64,
        initiated_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            ref_id,
            product_name,
            details,
            cost_price,
            selling_price,
            status: TransactionStatus::Pending,
            serial_number: None,
            failure_reason: None,
            provider_trx_id: None,
            initiated_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update applied to a stored transaction by the reconciler.
/// `None` fields are left untouched by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPatch {
    pub status: TransactionStatus,
    pub serial_number: Option<String>,
    pub failure_reason: Option<String>,
    pub provider_trx_id: Option<String>,
    pub cost_price: Option<i64>,
}
