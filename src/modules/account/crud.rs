use async_trait::async_trait;
use sqlx::{MySql, Pool};

use super::interface::{AccountStore, StoreError, StoreResult};
use super::model::Account;

/// Accounts persisted as JSON documents in the `accounts` table.
///
/// The `revision` column is authoritative; the copy inside the document is
/// overwritten on read.
pub struct MySqlAccountStore {
    pool: Pool<MySql>,
}

impl MySqlAccountStore {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    fn decode(document: String, revision: u64) -> StoreResult<Account> {
        let mut account: Account = serde_json::from_str(&document)?;
        account.revision = revision;
        Ok(account)
    }

    async fn exists(&self, id: &str) -> StoreResult<bool> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0 > 0)
    }
}

#[async_trait]
impl AccountStore for MySqlAccountStore {
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Account>> {
        let row: Option<(String, u64)> =
            sqlx::query_as("SELECT document, revision FROM accounts WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(document, revision)| Self::decode(document, revision))
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        // table collation is utf8mb4_bin, so this match is case-sensitive
        let row: Option<(String, u64)> =
            sqlx::query_as("SELECT document, revision FROM accounts WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(document, revision)| Self::decode(document, revision))
            .transpose()
    }

    async fn insert(&self, account: &Account) -> StoreResult<Account> {
        let mut stored = account.clone();
        stored.revision = 1;
        let document = serde_json::to_string(&stored)?;

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (id, email, revision, document, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&stored.id)
        .bind(&stored.email)
        .bind(stored.revision)
        .bind(&document)
        .bind(stored.created_at)
        .bind(stored.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(stored),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, account: &Account) -> StoreResult<Account> {
        let mut stored = account.clone();
        stored.revision = account.revision + 1;
        let document = serde_json::to_string(&stored)?;

        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET document = ?, revision = ?, updated_at = ?
            WHERE id = ? AND revision = ?
            "#,
        )
        .bind(&document)
        .bind(stored.revision)
        .bind(stored.updated_at)
        .bind(&account.id)
        .bind(account.revision)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            if self.exists(&account.id).await? {
                return Err(StoreError::RevisionConflict);
            }
            return Err(StoreError::Missing(account.id.clone()));
        }

        Ok(stored)
    }
}
