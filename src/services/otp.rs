use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::account::model::OtpEntry;
use crate::modules::account::{AccountKey, AccountWriter};
use crate::modules::auth::interface::{AuthError, Result};
use crate::services::clock::Clock;
use crate::services::metrics::AuthMetrics;
use crate::services::notifier::{self, EmailMessage, Notifier};

pub const OTP_DIGITS: usize = 6;
pub const OTP_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone)]
pub struct OtpIssued {
    pub code: String,
    pub device_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and redeems the email verification codes stored on the account.
pub struct OtpEngine {
    writer: AccountWriter,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<AuthMetrics>,
}

impl OtpEngine {
    pub fn new(
        writer: AccountWriter,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<AuthMetrics>,
    ) -> Self {
        Self {
            writer,
            clock,
            notifier,
            metrics,
        }
    }

    /// Appends a fresh code to the account's history and emails it.
    ///
    /// Codes issued earlier stay redeemable until they expire.
    pub async fn issue(&self, email: &str) -> Result<OtpIssued> {
        let (account, issued) = self
            .writer
            .modify(AccountKey::Email(email), |account| {
                let issued = OtpIssued {
                    code: generate_code(),
                    device_id: Uuid::new_v4().to_string(),
                    expires_at: self.clock.now() + Duration::minutes(OTP_TTL_MINUTES),
                };
                account.otps.push(OtpEntry {
                    code: issued.code.clone(),
                    device_id: issued.device_id.clone(),
                    expires_at: issued.expires_at,
                    verified: false,
                });
                Ok(issued)
            })
            .await?;

        self.metrics.otp_issued_total.inc();
        tracing::info!(account_id = %account.id, device_id = %issued.device_id, "otp issued");

        notifier::dispatch(
            self.notifier.clone(),
            self.metrics.clone(),
            EmailMessage::otp(&account.email, &issued.code, OTP_TTL_MINUTES),
        );

        Ok(issued)
    }

    /// Redeems `code` and marks the account verified.
    ///
    /// The earliest matching, unconsumed, unexpired entry wins. The device the
    /// code was issued for is not checked.
    pub async fn verify(&self, email: &str, code: &str) -> Result<()> {
        if !is_well_formed(code) {
            self.metrics.otp_verification("rejected");
            return Err(AuthError::InvalidOrExpiredOtp);
        }

        let result = self
            .writer
            .modify(AccountKey::Email(email), |account| {
                let now = self.clock.now();
                let entry = account
                    .otps
                    .iter_mut()
                    .find(|entry| entry.is_redeemable(code, now))
                    .ok_or(AuthError::InvalidOrExpiredOtp)?;

                entry.verified = true;
                account.verified = true;
                Ok(())
            })
            .await;

        match result {
            Ok((account, ())) => {
                self.metrics.otp_verification("accepted");
                tracing::info!(account_id = %account.id, "account verified");
                Ok(())
            }
            Err(e) => {
                if matches!(e, AuthError::InvalidOrExpiredOtp) {
                    self.metrics.otp_verification("rejected");
                }
                Err(e)
            }
        }
    }
}

fn generate_code() -> String {
    let value: u32 = rand::rng().random_range(0..1_000_000);
    format!("{value:0width$}", width = OTP_DIGITS)
}

fn is_well_formed(code: &str) -> bool {
    code.len() == OTP_DIGITS && code.bytes().all(|b| b.is_ascii_digit())
}
