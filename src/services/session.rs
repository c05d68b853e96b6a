use std::sync::Arc;
use uuid::Uuid;

use crate::modules::account::model::{PublicAccount, Role};
use crate::modules::account::{AccountKey, AccountWriter};
use crate::modules::auth::interface::{AuthError, Result};
use crate::services::hashing;
use crate::services::jwt::JwtService;
use crate::services::metrics::AuthMetrics;

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug)]
pub struct LoginOutcome {
    pub tokens: TokenPair,
    pub account: PublicAccount,
}

/// Logins, token rotation and the single-device binding.
pub struct SessionManager {
    writer: AccountWriter,
    jwt_service: JwtService,
    metrics: Arc<AuthMetrics>,
}

impl SessionManager {
    pub fn new(writer: AccountWriter, jwt_service: JwtService, metrics: Arc<AuthMetrics>) -> Self {
        Self {
            writer,
            jwt_service,
            metrics,
        }
    }

    /// Checks credentials, then verification, then binds a new device.
    ///
    /// An existing binding on another device is dropped without notice.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let Some(account) = self.writer.load(AccountKey::Email(email)).await? else {
            hashing::verify_dummy(password);
            self.metrics.login("invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        };

        if !hashing::verify_password(password, &account.password_hash)? {
            self.metrics.login("invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        }

        if !account.verified {
            self.metrics.login("unverified");
            return Err(AuthError::AccountNotVerified);
        }

        let tokens = self.mint(&account.id)?;
        let device_id = Uuid::new_v4().to_string();

        let (account, superseded) = self
            .writer
            .modify(AccountKey::Id(&account.id), |account| {
                let superseded = account
                    .is_logged_in
                    .then(|| account.device_id.clone().unwrap_or_default());
                account.clear_session();

                account.device_id = Some(device_id.clone());
                account.refresh_token = Some(tokens.refresh_token.clone());
                account.is_logged_in = true;
                Ok(superseded)
            })
            .await?;

        if let Some(previous) = superseded {
            self.metrics.forced_logouts_total.inc();
            tracing::info!(account_id = %account.id, previous_device = %previous, "previous session superseded by new login");
        }

        self.metrics.login("success");
        tracing::info!(account_id = %account.id, device_id = %device_id, "login succeeded");

        Ok(LoginOutcome {
            tokens,
            account: PublicAccount::from(&account),
        })
    }

    /// Exchanges the current refresh token for a new pair. The presented token
    /// stops working once the new one is stored.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = self
            .jwt_service
            .verify_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;

        let tokens = self.mint(&claims.sub)?;

        let result = self
            .writer
            .modify(AccountKey::Id(&claims.sub), |account| {
                let current = account.is_logged_in
                    && account.refresh_token.as_deref() == Some(refresh_token);
                if !current {
                    return Err(AuthError::InvalidToken);
                }
                account.refresh_token = Some(tokens.refresh_token.clone());
                Ok(())
            })
            .await;

        match result {
            Ok(_) => Ok(tokens),
            Err(AuthError::AccountNotFound) => Err(AuthError::InvalidToken),
            Err(e) => Err(e),
        }
    }

    pub async fn logout(&self, email: &str) -> Result<()> {
        let (account, ()) = self
            .writer
            .modify(AccountKey::Email(email), |account| {
                account.clear_session();
                Ok(())
            })
            .await?;

        tracing::info!(account_id = %account.id, "logged out");
        Ok(())
    }

    /// Validates a bearer access token and returns the account id it names.
    pub fn authenticate(&self, token: &str) -> Result<String> {
        self.jwt_service
            .verify_access_token(token)
            .map(|claims| claims.sub)
            .map_err(|_| AuthError::InvalidToken)
    }

    pub async fn require_admin(&self, account_id: &str) -> Result<()> {
        match self.writer.load(AccountKey::Id(account_id)).await? {
            Some(account) if account.role == Role::Admin => Ok(()),
            _ => Err(AuthError::Forbidden),
        }
    }

    /// The token holder may only act on their own account.
    pub async fn require_owner(&self, account_id: &str, email: &str) -> Result<()> {
        match self.writer.load(AccountKey::Id(account_id)).await? {
            Some(account) if account.email == email => Ok(()),
            _ => {
                tracing::warn!(account_id, "token holder tried to act on another account");
                Err(AuthError::Forbidden)
            }
        }
    }

    fn mint(&self, account_id: &str) -> Result<TokenPair> {
        let access_token = self
            .jwt_service
            .create_access_token(account_id)
            .map_err(|e| AuthError::Token(e.to_string()))?;
        let refresh_token = self
            .jwt_service
            .create_refresh_token(account_id)
            .map_err(|e| AuthError::Token(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_duration_secs(),
        })
    }
}
