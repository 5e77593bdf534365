//! Builds the post-reconciliation notification and hands it to the sink.
//! Dispatch is fire-and-forget: the task is spawned on the request path but
//! never awaited, never retried, and its failure never reaches the caller.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{NotificationRecord, Transaction, TransactionStatus, notification};
use crate::ports::NotificationSink;
use crate::providers::WebhookEnvelope;

pub fn build_record(
    tx: &Transaction,
    envelope: &WebhookEnvelope,
    provider: &str,
) -> NotificationRecord {
    let cost_price = envelope.cost_price.unwrap_or(tx.cost_price);
    let profit = match tx.status {
        TransactionStatus::Sukses => Some(tx.selling_price - cost_price),
        _ => None,
    };

    NotificationRecord {
        ref_id: tx.ref_id.clone(),
        product_name: tx.product_name.clone(),
        details: tx.details.clone(),
        status: tx.status,
        provider: provider.to_string(),
        cost_price,
        selling_price: tx.selling_price,
        profit,
        serial_number: tx.serial_number.clone(),
        failure_reason: tx.failure_reason.clone(),
        source: notification::WEBHOOK_SOURCE_TAG,
        processed_at: Utc::now(),
        initiated_by: tx.initiated_by.clone(),
    }
}

pub fn dispatch(sink: Arc<dyn NotificationSink>, record: NotificationRecord) {
    tokio::spawn(async move {
        sink.send(&record).await;
    });
}
