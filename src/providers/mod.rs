//! Provider adapters. Each upstream PPOB integration has its own wire
//! format, signature formula, and status vocabulary; everything downstream
//! of parsing works on the provider-neutral [`WebhookEnvelope`].

pub mod digiflazz;
pub mod tokovoucher;

use axum::http::HeaderMap;
use md5::{Digest, Md5};

use crate::domain::TransactionStatus;
use crate::ports::ProviderCredentials;

pub use digiflazz::Digiflazz;
pub use tokovoucher::TokoVoucher;

/// Provider-neutral view of one webhook delivery. Lives only for the
/// duration of the request; fully consumed into a transaction patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEnvelope {
    pub ref_id: String,
    pub status: String,
    pub response_code: Option<String>,
    pub serial_number: Option<String>,
    pub cost_price: Option<i64>,
    pub provider_trx_id: Option<String>,
    pub message: Option<String>,
    /// Signature carried in the body, for providers that put it there.
    pub body_signature: Option<String>,
}

/// One upstream provider variant: how to parse its body shape, where its
/// signature travels, what formula produces it, and how its status
/// vocabulary maps onto the internal tri-state.
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Parses an already-syntactically-valid JSON value into an envelope.
    /// Errors are schema violations, reported back as 400.
    fn parse(&self, body: &serde_json::Value) -> Result<WebhookEnvelope, String>;

    /// The provider's fixed signature formula over the admin-configured
    /// credentials and the delivery's reference id.
    fn expected_signature(&self, creds: &ProviderCredentials, ref_id: &str) -> String;

    /// Where the caller put its signature: body field or custom header.
    fn supplied_signature(&self, envelope: &WebhookEnvelope, headers: &HeaderMap)
        -> Option<String>;

    /// Total mapping from the provider's status vocabulary to the internal
    /// tri-state. Unrecognized input maps to `Gagal`, never to an error.
    fn map_status(&self, envelope: &WebhookEnvelope) -> TransactionStatus;
}

pub(crate) fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

pub(crate) fn require_string(
    value: &serde_json::Value,
    field: &str,
) -> Result<String, String> {
    match value.get(field) {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(serde_json::Value::String(_)) => Err(format!("field `{field}` is empty")),
        Some(_) => Err(format!("field `{field}` must be a string")),
        None => Err(format!("missing field `{field}`")),
    }
}

pub(crate) fn optional_string(value: &serde_json::Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

pub(crate) fn optional_price(value: &serde_json::Value, field: &str) -> Option<i64> {
    value.get(field).and_then(|v| v.as_i64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_hex_matches_known_vector() {
        // md5("abc") is a published test vector.
        assert_eq!(md5_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn require_string_rejects_missing_and_empty() {
        let value = serde_json::json!({"ref_id": "", "n": 5});
        assert!(require_string(&value, "ref_id").is_err());
        assert!(require_string(&value, "n").is_err());
        assert!(require_string(&value, "absent").is_err());
    }
}
