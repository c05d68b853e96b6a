pub mod accounts;
pub mod clock;
pub mod hashing;
pub mod jwt;
pub mod ledger;
pub mod metrics;
pub mod notifier;
pub mod otp;
pub mod rate_limit;
pub mod security;
pub mod session;
