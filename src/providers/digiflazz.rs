//! Digiflazz webhook variant.
//!
//! Body shape: `{"data": {...}, "sign": "..."}` with the signature carried
//! in the body. Formula: `MD5(username + api_key + ref_id)`.

use axum::http::HeaderMap;

use super::{
    ProviderAdapter, WebhookEnvelope, md5_hex, optional_price, optional_string, require_string,
};
use crate::domain::TransactionStatus;
use crate::ports::ProviderCredentials;

/// Digiflazz response codes that mean the transaction settled successfully.
const SUCCESS_CODES: &[&str] = &["00"];
/// Response codes for deliveries that are still in flight upstream.
const PENDING_CODES: &[&str] = &["03", "99"];

#[derive(Debug, Clone, Copy, Default)]
pub struct Digiflazz;

impl ProviderAdapter for Digiflazz {
    fn name(&self) -> &'static str {
        "digiflazz"
    }

    fn parse(&self, body: &serde_json::Value) -> Result<WebhookEnvelope, String> {
        let data = body
            .get("data")
            .ok_or_else(|| "missing field `data`".to_string())?;

        Ok(WebhookEnvelope {
            ref_id: require_string(data, "ref_id")?,
            status: require_string(data, "status")?,
            response_code: optional_string(data, "rc"),
            serial_number: optional_string(data, "sn").filter(|sn| !sn.is_empty()),
            cost_price: optional_price(data, "price").or(optional_price(data, "balance_cut")),
            provider_trx_id: optional_string(data, "trx_id"),
            message: optional_string(data, "message"),
            body_signature: optional_string(body, "sign"),
        })
    }

    fn expected_signature(&self, creds: &ProviderCredentials, ref_id: &str) -> String {
        md5_hex(&format!("{}{}{}", creds.identifier, creds.api_key, ref_id))
    }

    fn supplied_signature(
        &self,
        envelope: &WebhookEnvelope,
        _headers: &HeaderMap,
    ) -> Option<String> {
        envelope.body_signature.clone()
    }

    fn map_status(&self, envelope: &WebhookEnvelope) -> TransactionStatus {
        let status = envelope.status.to_ascii_lowercase();
        let code = envelope.response_code.as_deref();

        if status == "sukses" || status == "success" || code.is_some_and(|c| SUCCESS_CODES.contains(&c)) {
            TransactionStatus::Sukses
        } else if status == "pending" || code.is_some_and(|c| PENDING_CODES.contains(&c)) {
            TransactionStatus::Pending
        } else {
            TransactionStatus::Gagal
        }
    }
}
