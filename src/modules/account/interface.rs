use async_trait::async_trait;

use super::model::Account;

// =============================================================================
// STORE TRAIT
// =============================================================================

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Document store holding one record per account.
///
/// `save` is a compare-and-swap: it only succeeds when the stored revision
/// equals `account.revision`, and returns the record with the bumped revision.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;
    async fn insert(&self, account: &Account) -> StoreResult<Account>;
    async fn save(&self, account: &Account) -> StoreResult<Account>;
}

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Account {0} does not exist")]
    Missing(String),

    #[error("Revision conflict")]
    RevisionConflict,

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Connection-level failures mean the database cannot be reached right now;
/// everything else is a failed statement.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Unavailable(err.to_string()),
            other => Self::Database(other),
        }
    }
}
