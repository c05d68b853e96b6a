use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::interface::{AccountStore, StoreError, StoreResult};
use super::model::Account;

#[derive(Default)]
struct Documents {
    by_id: HashMap<String, Account>,
    email_index: HashMap<String, String>,
}

/// Process-local store. Used when no `DATABASE_URL` is configured, and in tests.
#[derive(Default)]
pub struct InMemoryAccountStore {
    documents: RwLock<Documents>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        Ok(self.documents.read().await.by_id.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let documents = self.documents.read().await;
        Ok(documents
            .email_index
            .get(email)
            .and_then(|id| documents.by_id.get(id))
            .cloned())
    }

    async fn insert(&self, account: &Account) -> StoreResult<Account> {
        let mut documents = self.documents.write().await;
        if documents.email_index.contains_key(&account.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let mut stored = account.clone();
        stored.revision = 1;
        documents
            .email_index
            .insert(stored.email.clone(), stored.id.clone());
        documents.by_id.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn save(&self, account: &Account) -> StoreResult<Account> {
        let mut documents = self.documents.write().await;
        let current = documents
            .by_id
            .get_mut(&account.id)
            .ok_or_else(|| StoreError::Missing(account.id.clone()))?;

        if current.revision != account.revision {
            return Err(StoreError::RevisionConflict);
        }

        let mut stored = account.clone();
        stored.revision = account.revision + 1;
        *current = stored.clone();
        Ok(stored)
    }
}
