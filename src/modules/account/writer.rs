use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;

use super::interface::{AccountStore, StoreError};
use super::model::Account;
use crate::modules::auth::interface::{AuthError, Result};
use crate::services::clock::Clock;

/// Revision conflicts left after in-process serialization come from other
/// processes sharing the store. The cycle re-runs against a fresh copy.
const MAX_ATTEMPTS: usize = 3;

type LockTable = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

#[derive(Debug, Clone, Copy)]
pub enum AccountKey<'a> {
    Id(&'a str),
    Email(&'a str),
}

/// Serializes mutations of one account: writers in this process queue on a
/// per-account lock, writers elsewhere are caught by the store's revision check.
#[derive(Clone)]
pub struct AccountWriter {
    store: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
    locks: LockTable,
}

/// Releases an account's lock table entry once no writer holds its lock.
/// Callers must drop their handle to the lock before the lease.
struct LockLease {
    table: LockTable,
    account_id: String,
}

impl LockLease {
    fn acquire(table: &LockTable, account_id: &str) -> (Self, Arc<AsyncMutex<()>>) {
        let lock = table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(account_id.to_string())
            .or_default()
            .clone();

        let lease = Self {
            table: table.clone(),
            account_id: account_id.to_string(),
        };
        (lease, lock)
    }
}

impl Drop for LockLease {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if table
            .get(&self.account_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            table.remove(&self.account_id);
        }
    }
}

impl AccountWriter {
    pub fn new(store: Arc<dyn AccountStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            locks: LockTable::default(),
        }
    }

    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    pub async fn load(&self, key: AccountKey<'_>) -> Result<Option<Account>> {
        let account = match key {
            AccountKey::Id(id) => self.store.find_by_id(id).await?,
            AccountKey::Email(email) => self.store.find_by_email(email).await?,
        };
        Ok(account)
    }

    pub async fn require(&self, key: AccountKey<'_>) -> Result<Account> {
        self.load(key).await?.ok_or(AuthError::AccountNotFound)
    }

    /// Applies `apply` to the current record and saves it with a revision check.
    ///
    /// Concurrent calls for the same account run one after another. If `apply`
    /// returns an error nothing is written. A revision conflict from another
    /// process reloads the record and runs `apply` again, up to `MAX_ATTEMPTS` times.
    pub async fn modify<T, F>(&self, key: AccountKey<'_>, mut apply: F) -> Result<(Account, T)>
    where
        F: FnMut(&mut Account) -> Result<T> + Send,
        T: Send,
    {
        let account_id = self.require(key).await?.id;

        let (lease, lock) = LockLease::acquire(&self.locks, &account_id);
        let result = {
            let _guard = lock.lock().await;
            self.apply_and_save(&account_id, &mut apply).await
        };
        drop(lock);
        drop(lease);

        result
    }

    async fn apply_and_save<T, F>(&self, account_id: &str, apply: &mut F) -> Result<(Account, T)>
    where
        F: FnMut(&mut Account) -> Result<T> + Send,
        T: Send,
    {
        for attempt in 1..=MAX_ATTEMPTS {
            let mut account = self.require(AccountKey::Id(account_id)).await?;
            let value = apply(&mut account)?;
            account.updated_at = self.clock.now();

            match self.store.save(&account).await {
                Ok(saved) => return Ok((saved, value)),
                Err(StoreError::RevisionConflict) => {
                    tracing::debug!(account_id, attempt, "revision conflict, reloading account");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AuthError::ConcurrentModification)
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
