//! Telegram Bot API notification sink. Best-effort by contract: every
//! failure is logged and swallowed, nothing propagates to the webhook
//! request that spawned the send.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{NotificationRecord, TransactionStatus};
use crate::ports::NotificationSink;

pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self::with_api_base("https://api.telegram.org".to_string(), bot_token, chat_id)
    }

    pub fn with_api_base(api_base: String, bot_token: String, chat_id: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_base,
            bot_token,
            chat_id,
        }
    }

    fn format_message(record: &NotificationRecord) -> String {
        let mut lines = vec![
            format!("[{}] {}", record.source, record.status),
            format!("Ref: {}", record.ref_id),
            format!("Produk: {}", record.product_name),
            format!("Tujuan: {}", record.details),
            format!("Provider: {}", record.provider),
            format!("Modal: Rp{}", record.cost_price),
            format!("Jual: Rp{}", record.selling_price),
        ];

        if let Some(profit) = record.profit {
            lines.push(format!("Profit: Rp{}", profit));
        }
        if let Some(sn) = &record.serial_number {
            lines.push(format!("SN: {}", sn));
        }
        if record.status == TransactionStatus::Gagal {
            let reason = record.failure_reason.as_deref().unwrap_or("-");
            lines.push(format!("Alasan: {}", reason));
        }
        lines.push(format!("Oleh: {}", record.initiated_by));

        lines.join("\n")
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn send(&self, record: &NotificationRecord) {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": Self::format_message(record),
        });

        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(ref_id = %record.ref_id, "notification delivered");
            }
            Ok(response) => {
                tracing::warn!(
                    ref_id = %record.ref_id,
                    status = %response.status(),
                    "notification rejected by Telegram, dropping"
                );
            }
            Err(err) => {
                tracing::warn!(
                    ref_id = %record.ref_id,
                    error = %err,
                    "notification send failed, dropping"
                );
            }
        }
    }
}

/// Sink used when no Telegram credentials are configured.
pub struct NoopNotifier;

#[async_trait]
impl NotificationSink for NoopNotifier {
    async fn send(&self, record: &NotificationRecord) {
        tracing::debug!(ref_id = %record.ref_id, "notification sink not configured, dropping");
    }
}
