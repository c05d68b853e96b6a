use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

const NAMESPACE: &str = "recipe_accounts";

/// Counters for the account lifecycle, OTP and session flows.
pub struct AuthMetrics {
    registry: Registry,

    pub registrations_total: IntCounter,
    pub otp_issued_total: IntCounter,
    pub otp_verified_total: IntCounterVec,
    pub logins_total: IntCounterVec,
    pub forced_logouts_total: IntCounter,
    pub checkouts_total: IntCounter,
    pub notification_failures_total: IntCounterVec,
}

impl AuthMetrics {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let registrations_total = IntCounter::with_opts(
            Opts::new("registrations_total", "Accounts registered").namespace(NAMESPACE),
        )?;
        registry.register(Box::new(registrations_total.clone()))?;

        let otp_issued_total = IntCounter::with_opts(
            Opts::new("otp_issued_total", "One-time codes issued").namespace(NAMESPACE),
        )?;
        registry.register(Box::new(otp_issued_total.clone()))?;

        let otp_verified_total = IntCounterVec::new(
            Opts::new("otp_verified_total", "One-time code verification attempts")
                .namespace(NAMESPACE),
            &["result"],
        )?;
        registry.register(Box::new(otp_verified_total.clone()))?;

        let logins_total = IntCounterVec::new(
            Opts::new("logins_total", "Login attempts").namespace(NAMESPACE),
            &["result"],
        )?;
        registry.register(Box::new(logins_total.clone()))?;

        let forced_logouts_total = IntCounter::with_opts(
            Opts::new("forced_logouts_total", "Device bindings superseded by a new login")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(forced_logouts_total.clone()))?;

        let checkouts_total = IntCounter::with_opts(
            Opts::new("checkouts_total", "Carts converted into purchases").namespace(NAMESPACE),
        )?;
        registry.register(Box::new(checkouts_total.clone()))?;

        let notification_failures_total = IntCounterVec::new(
            Opts::new("notification_failures_total", "Emails that could not be delivered")
                .namespace(NAMESPACE),
            &["template"],
        )?;
        registry.register(Box::new(notification_failures_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            registrations_total,
            otp_issued_total,
            otp_verified_total,
            logins_total,
            forced_logouts_total,
            checkouts_total,
            notification_failures_total,
        }))
    }

    pub fn login(&self, result: &str) {
        self.logins_total.with_label_values(&[result]).inc();
    }

    pub fn otp_verification(&self, result: &str) {
        self.otp_verified_total.with_label_values(&[result]).inc();
    }

    /// Prometheus text exposition of everything registered.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
