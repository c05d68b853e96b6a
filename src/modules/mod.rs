pub mod account;
pub mod auth;
pub mod ledger;
pub mod metrics;
