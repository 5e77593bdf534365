//! Notification record assembled after a successful reconciliation and
//! handed to the outbound messaging sink.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::TransactionStatus;

/// Source tag stamped on every record produced by the webhook pipeline.
pub const WEBHOOK_SOURCE_TAG: &str = "Webhook Update";

#[derive(Debug, Clone, Serialize)]
pub struct NotificationRecord {
    pub ref_id: String,
    pub product_name: String,
    pub details: String,
    pub status: TransactionStatus,
    pub provider: String,
    /// Best-known cost price: the webhook's corrected value when supplied,
    /// otherwise the stored one.
    pub cost_price: i64,
    pub selling_price: i64,
    /// Only computed for `Sukses`.
    pub profit: Option<i64>,
    pub serial_number: Option<String>,
    pub failure_reason: Option<String>,
    pub source: &'static str,
    pub processed_at: DateTime<Utc>,
    pub initiated_by: String,
}
