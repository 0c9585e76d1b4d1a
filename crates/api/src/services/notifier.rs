//! Production notifier: email + chat webhook.
//!
//! Implements the domain [`VisitNotifier`] trait. Email goes through the
//! configured provider (`console` logs, `sendgrid` posts to the SendGrid
//! API); chat is a generic webhook POST with an HMAC-SHA256 payload
//! signature. All failures are reported back as [`NotificationResult`]
//! values for the lifecycle to log; nothing is retried.

use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::json;
use sha2::Sha256;

use domain::models::Host;
use domain::services::{ArrivalNotice, DecisionOutcome, NotificationResult, VisitNotifier};

use crate::config::NotificationsConfig;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook payload signature.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Email + chat webhook notifier.
pub struct LifecycleNotifier {
    client: Client,
    config: NotificationsConfig,
}

impl LifecycleNotifier {
    pub fn new(config: NotificationsConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Signs a webhook payload, returning a `sha256=<hex>` header value.
    fn sign_payload(payload: &str, secret: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), String> {
        match self.config.email_provider.as_str() {
            "console" => {
                tracing::info!(
                    to = %to,
                    subject = %subject,
                    body = %body,
                    "Console email provider: not actually sending"
                );
                Ok(())
            }
            "sendgrid" => self.send_sendgrid(to, subject, body).await,
            provider => Err(format!("unknown email provider: {}", provider)),
        }
    }

    async fn send_sendgrid(&self, to: &str, subject: &str, body: &str) -> Result<(), String> {
        if self.config.sendgrid_api_key.is_empty() {
            return Err("sendgrid_api_key not configured".to_string());
        }

        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.config.sender_email },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }]
        });

        let response = self
            .client
            .post("https://api.sendgrid.com/v3/mail/send")
            .bearer_auth(&self.config.sendgrid_api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| format!("sendgrid request failed: {}", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("sendgrid returned {}", response.status()))
        }
    }

    /// Posts a signed message to the chat webhook. Skipped silently when no
    /// webhook is configured.
    async fn send_chat(&self, text: &str) -> Result<(), String> {
        if self.config.chat_webhook_url.is_empty() {
            return Ok(());
        }

        let payload = json!({ "text": text }).to_string();
        let signature = Self::sign_payload(&payload, &self.config.chat_webhook_secret);

        let response = self
            .client
            .post(&self.config.chat_webhook_url)
            .header(SIGNATURE_HEADER, signature)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| format!("chat webhook request failed: {}", e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(format!("chat webhook returned {}", response.status()))
        }
    }
}

#[async_trait::async_trait]
impl VisitNotifier for LifecycleNotifier {
    async fn notify_host_of_arrival(
        &self,
        host: &Host,
        notice: &ArrivalNotice,
    ) -> NotificationResult {
        if !self.config.enabled {
            return NotificationResult::Skipped;
        }

        let subject = "Your visitor has arrived";
        let company = notice
            .visitor_company
            .as_deref()
            .map(|c| format!(" ({})", c))
            .unwrap_or_default();
        let body = format!(
            "Hi {},\n\n{}{} has checked in at {} to see you.\nPurpose: {}\n",
            host.name,
            notice.visitor_name,
            company,
            notice.site.display_name(),
            notice.purpose,
        );

        let mut failures = Vec::new();

        if let Err(reason) = self.send_email(&host.email, subject, &body).await {
            failures.push(format!("email: {}", reason));
        }

        let chat_text = format!(
            "{}{} arrived at {} for {}",
            notice.visitor_name,
            company,
            notice.site.display_name(),
            host.name,
        );
        if let Err(reason) = self.send_chat(&chat_text).await {
            failures.push(format!("chat: {}", reason));
        }

        if failures.is_empty() {
            NotificationResult::Sent
        } else {
            NotificationResult::Failed(failures.join("; "))
        }
    }

    async fn notify_visitor_of_decision(
        &self,
        visitor_email: &str,
        outcome: DecisionOutcome,
        host_name: &str,
    ) -> NotificationResult {
        if !self.config.enabled {
            return NotificationResult::Skipped;
        }

        let (subject, body) = match outcome {
            DecisionOutcome::Approved => (
                "Your visit has been approved",
                format!(
                    "Your visit request to see {} has been approved.\nPresent your pass at the reception desk on arrival.\n",
                    host_name
                ),
            ),
            DecisionOutcome::Rejected => (
                "Your visit request was declined",
                format!("Your visit request to see {} was declined.\n", host_name),
            ),
        };

        match self.send_email(visitor_email, subject, &body).await {
            Ok(()) => NotificationResult::Sent,
            Err(reason) => NotificationResult::Failed(format!("email: {}", reason)),
        }
    }
}
