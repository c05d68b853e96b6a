//! Outbound email. Delivery is best-effort: callers hand a message to
//! [`dispatch`] and move on; failures are logged and counted, never returned.

pub mod message;
pub mod relay;
pub mod signature;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::services::metrics::AuthMetrics;

pub use message::{EmailMessage, Template};
pub use relay::RelayMailer;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Relay rejected message with status {0}")]
    Rejected(u16),

    #[error("Signing error: {0}")]
    Signing(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

/// Used when no relay is configured; writes the message to the log instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        tracing::info!(to = %message.to, subject = %message.subject, "mail relay not configured, email not sent");
        tracing::debug!(body = %message.body, "undelivered email body");
        Ok(())
    }
}

/// Sends `message` on its own task. The caller's response never waits on it.
pub fn dispatch(
    notifier: Arc<dyn Notifier>,
    metrics: Arc<AuthMetrics>,
    message: EmailMessage,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let template = message.template.as_str();
        match notifier.send(&message).await {
            Ok(()) => tracing::debug!(to = %message.to, template, "email sent"),
            Err(e) => {
                metrics
                    .notification_failures_total
                    .with_label_values(&[template])
                    .inc();
                tracing::warn!(to = %message.to, template, error = %e, "failed to send email");
            }
        }
    })
}
