//! TokoVoucher webhook variant.
//!
//! Flat body shape; the signature travels in the
//! `X-TokoVoucher-Authorization` header. Formula:
//! `MD5(member_code + ":" + key + ":" + ref_id)`.

use axum::http::HeaderMap;

use super::{
    ProviderAdapter, WebhookEnvelope, md5_hex, optional_price, optional_string, require_string,
};
use crate::domain::TransactionStatus;
use crate::ports::ProviderCredentials;

pub const AUTH_HEADER: &str = "x-tokovoucher-authorization";

const SUCCESS_CODES: &[&str] = &["00"];

#[derive(Debug, Clone, Copy, Default)]
pub struct TokoVoucher;

impl ProviderAdapter for TokoVoucher {
    fn name(&self) -> &'static str {
        "tokovoucher"
    }

    fn parse(&self, body: &serde_json::Value) -> Result<WebhookEnvelope, String> {
        Ok(WebhookEnvelope {
            ref_id: require_string(body, "ref_id")?,
            status: require_string(body, "status")?,
            response_code: optional_string(body, "code"),
            serial_number: optional_string(body, "sn").filter(|sn| !sn.is_empty()),
            cost_price: optional_price(body, "price"),
            provider_trx_id: optional_string(body, "trx_id"),
            message: optional_string(body, "message"),
            body_signature: None,
        })
    }

    fn expected_signature(&self, creds: &ProviderCredentials, ref_id: &str) -> String {
        md5_hex(&format!("{}:{}:{}", creds.identifier, creds.api_key, ref_id))
    }

    fn supplied_signature(
        &self,
        _envelope: &WebhookEnvelope,
        headers: &HeaderMap,
    ) -> Option<String> {
        headers
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }

    fn map_status(&self, envelope: &WebhookEnvelope) -> TransactionStatus {
        let status = envelope.status.to_ascii_lowercase();
        let code = envelope.response_code.as_deref();

        if status == "sukses" || status == "success" || code.is_some_and(|c| SUCCESS_CODES.contains(&c)) {
            TransactionStatus::Sukses
        } else if status == "pending" {
            TransactionStatus::Pending
        } else {
            TransactionStatus::Gagal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn creds() -> ProviderCredentials {
        ProviderCredentials {
            identifier: "M123".into(),
            api_key: "secret".into(),
            ip_allow_list: vec!["10.0.0.1".into()],
        }
    }

    #[test]
    fn parses_flat_body() {
        let body = json!({
            "ref_id": "T2",
            "trx_id": "TV-99",
            "status": "pending",
            "price": 5000,
            "target": "08123",
            "message": "diproses"
        });

        let envelope = TokoVoucher.parse(&body).unwrap();
        assert_eq!(envelope.ref_id, "T2");
        assert_eq!(envelope.provider_trx_id.as_deref(), Some("TV-99"));
        assert_eq!(envelope.cost_price, Some(5000));
        assert_eq!(envelope.body_signature, None);
    }

    #[test]
    fn signature_formula_is_colon_separated() {
        assert_eq!(
            TokoVoucher.expected_signature(&creds(), "T2"),
            md5_hex("M123:secret:T2")
        );
    }

    #[test]
    fn signature_comes_from_header() {
        let envelope = TokoVoucher
            .parse(&json!({"ref_id": "T2", "status": "sukses"}))
            .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, HeaderValue::from_static("abcd1234"));

        assert_eq!(
            TokoVoucher.supplied_signature(&envelope, &headers).as_deref(),
            Some("abcd1234")
        );
        assert_eq!(
            TokoVoucher.supplied_signature(&envelope, &HeaderMap::new()),
            None
        );
    }

    #[test]
    fn unrecognized_status_falls_through_to_gagal() {
        let envelope = TokoVoucher
            .parse(&json!({"ref_id": "T2", "status": "refund"}))
            .unwrap();
        assert_eq!(TokoVoucher.map_status(&envelope), TransactionStatus::Gagal);
    }
}
