use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::signature::sign_relay_request;
use super::{EmailMessage, Notifier, NotifyError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Hands emails to an HTTP mail relay. Requests are signed so the relay can
/// reject anything that did not come from us.
pub struct RelayMailer {
    client: Client,
    url: String,
    secret: String,
    from_address: String,
}

impl RelayMailer {
    pub fn new(url: String, secret: String, from_address: String) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            url,
            secret,
            from_address,
        })
    }
}

#[async_trait]
impl Notifier for RelayMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        let body = serde_json::to_string(&RelayPayload {
            from: &self.from_address,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        })?;

        let timestamp = Utc::now().timestamp();
        let signature = sign_relay_request(&self.secret, timestamp, &body)?;

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("X-Relay-Signature", signature)
            .header("X-Relay-Timestamp", timestamp.to_string())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}
