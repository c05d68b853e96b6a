use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::modules::account::model::{Account, ProfileUpdate, PublicAccount};
use crate::modules::account::{AccountKey, AccountWriter};
use crate::modules::auth::interface::{AuthError, Result};
use crate::modules::auth::schema::RegisterRequest;
use crate::services::clock::Clock;
use crate::services::hashing;
use crate::services::metrics::AuthMetrics;
use crate::services::notifier::{self, EmailMessage, Notifier};

/// Registration and profile maintenance.
pub struct AccountLifecycle {
    writer: AccountWriter,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    metrics: Arc<AuthMetrics>,
}

impl AccountLifecycle {
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

    /// Creates an unverified account and returns its id. The welcome email is
    /// sent in the background; its failure does not fail registration.
    pub async fn register(&self, request: RegisterRequest) -> Result<String> {
        request.validate()?;

        if self.writer.load(AccountKey::Email(&request.email)).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = hashing::hash_password(&request.password)?;
        let account = Account::new(
            Uuid::new_v4().to_string(),
            request.email,
            request.username,
            password_hash,
            request.profile,
            self.clock.now(),
        );

        // the store's unique email index catches a registration that raced past the check above
        let account = self.writer.store().insert(&account).await?;

        self.metrics.registrations_total.inc();
        tracing::info!(account_id = %account.id, "account registered");

        notifier::dispatch(
            self.notifier.clone(),
            self.metrics.clone(),
            EmailMessage::registration(&account.email, &account.username),
        );

        Ok(account.id)
    }

    /// Overwrites only the profile fields present in `update`.
    pub async fn update_profile(&self, email: &str, update: ProfileUpdate) -> Result<PublicAccount> {
        let (account, ()) = self
            .writer
            .modify(AccountKey::Email(email), |account| {
                update.clone().apply_to(&mut account.profile);
                Ok(())
            })
            .await?;

        tracing::debug!(account_id = %account.id, "profile updated");
        Ok(PublicAccount::from(&account))
    }

    pub async fn profile(&self, account_id: &str) -> Result<PublicAccount> {
        let account = self.writer.require(AccountKey::Id(account_id)).await?;
        Ok(PublicAccount::from(&account))
    }
}
