//! The linear per-request webhook pipeline:
//! receive → verify → reconcile → notify.

use axum::http::HeaderMap;
use serde_json::{Value, json};

use crate::AppState;
use crate::error::AppError;
use crate::providers::ProviderAdapter;
use crate::services::{notifier, reconciler, reconciler::ReconcileOutcome, verifier};

/// Terminal outcome of one delivery, as acknowledged to the provider.
/// All variants answer 200; anything that should change the HTTP status
/// is raised as [`AppError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookAck {
    Updated,
    /// Benign no-op: empty ping, unknown reference, or a conflicting
    /// redelivery for a settled transaction.
    Ignored,
    /// Post-auth processing fault, acknowledged anyway so the provider
    /// does not keep retrying a delivery we already consumed.
    Error,
}

impl WebhookAck {
    pub fn body(&self) -> Value {
        let status = match self {
            WebhookAck::Updated => "updated",
            WebhookAck::Ignored => "ignored",
            WebhookAck::Error => "error",
        };
        json!({ "status": status })
    }
}

#[tracing::instrument(
    name = "webhook_delivery",
    skip_all,
    fields(provider = adapter.name(), ref_id = tracing::field::Empty)
)]
pub async fn handle_delivery(
    state: &AppState,
    adapter: &dyn ProviderAdapter,
    headers: &HeaderMap,
    body: String,
) -> Result<WebhookAck, AppError> {
    // Some providers send empty keep-alive pings; acknowledge and move on.
    if body.trim().is_empty() {
        tracing::debug!("empty webhook body, acknowledging as no-op");
        return Ok(WebhookAck::Ignored);
    }

    let value: Value = serde_json::from_str(&body).map_err(|err| {
        tracing::warn!(raw_body = %body, "unparseable webhook body");
        AppError::MalformedBody(err.to_string())
    })?;

    let envelope = adapter.parse(&value).map_err(|diff| {
        tracing::warn!(raw_body = %body, %diff, "webhook body failed schema validation");
        AppError::SchemaInvalid(diff)
    })?;
    tracing::Span::current().record("ref_id", tracing::field::display(&envelope.ref_id));

    // Credentials are read fresh on every delivery; admins may rotate them
    // at any time.
    let creds = state
        .settings
        .provider_credentials(adapter.name())
        .await?
        .ok_or_else(|| AppError::ConfigurationMissing(adapter.name().to_string()))?;

    verifier::verify(adapter, &envelope, headers, &creds)?;

    match reconciler::reconcile(state.transactions.as_ref(), adapter, &envelope).await {
        ReconcileOutcome::Updated(tx) => {
            let record = notifier::build_record(&tx, &envelope, adapter.name());
            notifier::dispatch(state.notifier.clone(), record);
            Ok(WebhookAck::Updated)
        }
        ReconcileOutcome::UnknownReference | ReconcileOutcome::TerminalConflict { .. } => {
            Ok(WebhookAck::Ignored)
        }
        ReconcileOutcome::PersistenceFailure(err) => {
            tracing::error!(error = %err, "reconciliation write failed after successful auth");
            Ok(WebhookAck::Error)
        }
    }
}
