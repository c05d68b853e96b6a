use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

use crate::modules::auth::interface::{AuthError, Result};

const DEFAULT_PER_HOUR: NonZeroU32 = NonZeroU32::MIN.saturating_add(4);
const TRACKED_KEYS_SOFT_CAP: usize = 10_000;

/// Caps OTP requests per email address so a single inbox cannot be flooded.
pub struct OtpThrottle {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl OtpThrottle {
    /// `per_hour` requests per address, all of which may be spent at once.
    /// Zero falls back to the default of 5.
    pub fn new(per_hour: u32) -> Self {
        let per_hour = NonZeroU32::new(per_hour).unwrap_or(DEFAULT_PER_HOUR);
        let quota = Quota::per_hour(per_hour).allow_burst(per_hour);
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    pub fn check(&self, email: &str) -> Result<()> {
        if self.limiter.check_key(&email.to_string()).is_err() {
            tracing::warn!(email, "otp request throttled");
            return Err(AuthError::RateLimited);
        }
        if self.limiter.len() > TRACKED_KEYS_SOFT_CAP {
            self.limiter.retain_recent();
        }
        Ok(())
    }
}
