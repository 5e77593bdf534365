//! Authenticity checks for inbound webhook deliveries: source-IP allow-list
//! and signature comparison. Pure given its inputs; runs before any
//! transaction mutation.

use std::net::IpAddr;
use std::str::FromStr;

use axum::http::HeaderMap;
use ipnet::IpNet;

use crate::error::AppError;
use crate::ports::ProviderCredentials;
use crate::providers::{ProviderAdapter, WebhookEnvelope};

/// Resolves the caller's IP: first entry of the forwarded-for chain, then
/// the direct real-IP header, then loopback.
pub fn resolve_client_ip(headers: &HeaderMap) -> IpAddr {
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| raw.split(',').next())
        .and_then(|entry| IpAddr::from_str(entry.trim()).ok())
    {
        return ip;
    }

    if let Some(ip) = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| IpAddr::from_str(raw.trim()).ok())
    {
        return ip;
    }

    IpAddr::from([127, 0, 0, 1])
}

/// Allow-list entries may be bare IPs or CIDR blocks. An empty list is an
/// explicit opt-out of the check.
fn ip_allowed(client_ip: IpAddr, allow_list: &[String]) -> bool {
    if allow_list.is_empty() {
        return true;
    }

    allow_list.iter().map(|entry| entry.trim()).any(|entry| {
        if let Ok(ip) = IpAddr::from_str(entry) {
            return ip == client_ip;
        }
        if let Ok(cidr) = IpNet::from_str(entry) {
            return cidr.contains(&client_ip);
        }
        false
    })
}

/// Verifies one delivery against the provider's configured credentials.
/// Both checks are side-effect free; `Err` carries the HTTP-facing outcome.
pub fn verify(
    adapter: &dyn ProviderAdapter,
    envelope: &WebhookEnvelope,
    headers: &HeaderMap,
    creds: &ProviderCredentials,
) -> Result<(), AppError> {
    let client_ip = resolve_client_ip(headers);
    if !ip_allowed(client_ip, &creds.ip_allow_list) {
        tracing::warn!(
            provider = adapter.name(),
            ref_id = %envelope.ref_id,
            client_ip = %client_ip,
            "webhook rejected: source IP not in allow-list"
        );
        return Err(AppError::Forbidden("source IP not allowed".to_string()));
    }

    let expected = adapter.expected_signature(creds, &envelope.ref_id);
    match adapter.supplied_signature(envelope, headers) {
        Some(supplied) if supplied == expected => Ok(()),
        Some(_) => {
            tracing::warn!(
                provider = adapter.name(),
                ref_id = %envelope.ref_id,
                "webhook rejected: signature mismatch"
            );
            Err(AppError::Forbidden("invalid signature".to_string()))
        }
        None => {
            tracing::warn!(
                provider = adapter.name(),
                ref_id = %envelope.ref_id,
                "webhook rejected: no signature supplied"
            );
            Err(AppError::Forbidden("missing signature".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{Digiflazz, TokoVoucher, tokovoucher::AUTH_HEADER};
    use axum::http::HeaderValue;

    fn envelope(ref_id: &str, sign: Option<&str>) -> WebhookEnvelope {
        WebhookEnvelope {
            ref_id: ref_id.into(),
            status: "Sukses".into(),
            response_code: None,
            serial_number: None,
            cost_price: None,
            provider_trx_id: None,
            message: None,
            body_signature: sign.map(String::from),
        }
    }

    fn creds(allow_list: Vec<String>) -> ProviderCredentials {
        ProviderCredentials {
            identifier: "user".into(),
            api_key: "key".into(),
            ip_allow_list: allow_list,
        }
    }

    #[test]
    fn xff_first_entry_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.10, 198.51.100.7"),
        );
        assert_eq!(
            resolve_client_ip(&headers),
            IpAddr::from([203, 0, 113, 10])
        );
    }

    #[test]
    fn real_ip_is_fallback_then_loopback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));
        assert_eq!(
            resolve_client_ip(&headers),
            IpAddr::from([198, 51, 100, 7])
        );

        assert_eq!(
            resolve_client_ip(&HeaderMap::new()),
            IpAddr::from([127, 0, 0, 1])
        );
    }

    #[test]
    fn allow_list_matches_exact_ip_and_cidr() {
        let ip = IpAddr::from([203, 0, 113, 10]);
        assert!(ip_allowed(ip, &["203.0.113.10".to_string()]));
        assert!(ip_allowed(ip, &["203.0.113.0/24".to_string()]));
        assert!(!ip_allowed(ip, &["198.51.100.0/24".to_string()]));
        assert!(!ip_allowed(ip, &["not-an-ip".to_string()]));
    }

    #[test]
    fn empty_allow_list_skips_ip_check() {
        assert!(ip_allowed(IpAddr::from([8, 8, 8, 8]), &[]));
    }

    #[test]
    fn valid_body_signature_accepted() {
        let creds = creds(vec![]);
        let sign = Digiflazz.expected_signature(&creds, "T1");
        let envelope = envelope("T1", Some(&sign));

        assert!(verify(&Digiflazz, &envelope, &HeaderMap::new(), &creds).is_ok());
    }

    #[test]
    fn any_signature_mutation_rejects() {
        let creds = creds(vec![]);
        let mut sign = Digiflazz.expected_signature(&creds, "T1");
        // Flip a single character.
        let flipped = if sign.ends_with('0') { '1' } else { '0' };
        sign.pop();
        sign.push(flipped);
        let envelope = envelope("T1", Some(&sign));

        assert!(matches!(
            verify(&Digiflazz, &envelope, &HeaderMap::new(), &creds),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn missing_signature_rejects() {
        let creds = creds(vec![]);
        let envelope = envelope("T1", None);
        assert!(matches!(
            verify(&Digiflazz, &envelope, &HeaderMap::new(), &creds),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn denied_ip_rejects_even_with_valid_signature() {
        let creds = creds(vec!["10.0.0.0/8".to_string()]);
        let envelope = envelope("T2", None);

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.9"));
        let sign = TokoVoucher.expected_signature(&creds, "T2");
        headers.insert(AUTH_HEADER, HeaderValue::from_str(&sign).unwrap());

        assert!(matches!(
            verify(&TokoVoucher, &envelope, &headers, &creds),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn allowed_ip_with_header_signature_accepted() {
        let creds = creds(vec!["10.0.0.1".to_string()]);
        let envelope = envelope("T2", None);

        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        let sign = TokoVoucher.expected_signature(&creds, "T2");
        headers.insert(AUTH_HEADER, HeaderValue::from_str(&sign).unwrap());

        assert!(verify(&TokoVoucher, &envelope, &headers, &creds).is_ok());
    }
}
