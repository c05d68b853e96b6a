use std::env;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3005";
const DEFAULT_MAIL_FROM: &str = "no-reply@recipes.local";
const DEFAULT_OTP_REQUESTS_PER_HOUR: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Mail relay settings; absent when the service should only log emails.
#[derive(Debug, Clone)]
pub struct MailRelayConfig {
    pub url: String,
    pub secret: String,
    pub from_address: String,
}

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub mail_relay: Option<MailRelayConfig>,
    pub otp_requests_per_hour: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let mail_relay = match var("MAIL_RELAY_URL") {
            Some(url) => Some(MailRelayConfig {
                url,
                secret: var("MAIL_RELAY_SECRET").ok_or(ConfigError::Missing("MAIL_RELAY_SECRET"))?,
                from_address: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            }),
            None => None,
        };

        let otp_requests_per_hour = match var("OTP_REQUESTS_PER_HOUR") {
            Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    name: "OTP_REQUESTS_PER_HOUR",
                    reason: e.to_string(),
                }
            })?,
            None => DEFAULT_OTP_REQUESTS_PER_HOUR,
        };

        Ok(Self {
            jwt_secret,
            database_url: var("DATABASE_URL"),
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            mail_relay,
            otp_requests_per_hour,
        })
    }
}
