//! Applies an authenticated webhook envelope to the stored transaction.
//! Lookup always precedes the write; the patch only carries fields the
//! envelope actually supplied, so repeated deliveries converge.

use crate::domain::{Transaction, TransactionPatch, TransactionStatus};
use crate::ports::TransactionRepository;
use crate::providers::{ProviderAdapter, WebhookEnvelope};

#[derive(Debug)]
pub enum ReconcileOutcome {
    Updated(Transaction),
    /// No stored transaction matches the reference id. Acknowledged to the
    /// caller as a no-op so retried or misdirected deliveries do not turn
    /// into retry storms.
    UnknownReference,
    /// The delivery would move an already-settled transaction to a
    /// different status. The record is left as is.
    TerminalConflict {
        stored: TransactionStatus,
        incoming: TransactionStatus,
    },
    PersistenceFailure(String),
}

pub fn build_patch(
    adapter: &dyn ProviderAdapter,
    envelope: &WebhookEnvelope,
) -> TransactionPatch {
    let status = adapter.map_status(envelope);
    TransactionPatch {
        status,
        serial_number: envelope.serial_number.clone(),
        failure_reason: match status {
            TransactionStatus::Gagal => envelope.message.clone(),
            _ => None,
        },
        provider_trx_id: envelope.provider_trx_id.clone(),
        cost_price: envelope.cost_price,
    }
}

pub async fn reconcile(
    repo: &dyn TransactionRepository,
    adapter: &dyn ProviderAdapter,
    envelope: &WebhookEnvelope,
) -> ReconcileOutcome {
    let existing = match repo.get_by_ref_id(&envelope.ref_id).await {
        Ok(Some(tx)) => tx,
        Ok(None) => {
            tracing::info!(
                provider = adapter.name(),
                ref_id = %envelope.ref_id,
                "webhook for unknown reference, ignoring"
            );
            return ReconcileOutcome::UnknownReference;
        }
        Err(err) => return ReconcileOutcome::PersistenceFailure(err.to_string()),
    };

    let patch = build_patch(adapter, envelope);

    if existing.status.is_terminal() && patch.status != existing.status {
        tracing::warn!(
            provider = adapter.name(),
            ref_id = %envelope.ref_id,
            stored = %existing.status,
            incoming = %patch.status,
            "conflicting redelivery for settled transaction, ignoring"
        );
        return ReconcileOutcome::TerminalConflict {
            stored: existing.status,
            incoming: patch.status,
        };
    }

    match repo.apply_patch(&envelope.ref_id, &patch).await {
        Ok(updated) => {
            tracing::info!(
                provider = adapter.name(),
                ref_id = %envelope.ref_id,
                status = %updated.status,
                "transaction reconciled"
            );
            ReconcileOutcome::Updated(updated)
        }
        Err(err) => ReconcileOutcome::PersistenceFailure(err.to_string()),
    }
}
