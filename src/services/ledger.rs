use std::sync::Arc;

use crate::modules::account::model::{CartEntry, PurchaseEntry};
use crate::modules::account::{AccountKey, AccountWriter};
use crate::modules::auth::interface::{AuthError, Result};
use crate::services::clock::Clock;
use crate::services::metrics::AuthMetrics;

/// Favorites, cart and purchase bookkeeping on the account record.
pub struct Ledger {
    writer: AccountWriter,
    clock: Arc<dyn Clock>,
    metrics: Arc<AuthMetrics>,
}

impl Ledger {
    pub fn new(writer: AccountWriter, clock: Arc<dyn Clock>, metrics: Arc<AuthMetrics>) -> Self {
        Self {
            writer,
            clock,
            metrics,
        }
    }

    pub async fn add_favorite(&self, account_id: &str, item_id: &str) -> Result<Vec<String>> {
        let (account, ()) = self
            .writer
            .modify(AccountKey::Id(account_id), |account| {
                if !account.favorites.iter().any(|id| id == item_id) {
                    account.favorites.push(item_id.to_string());
                }
                Ok(())
            })
            .await?;

        Ok(account.favorites)
    }

    pub async fn remove_favorite(&self, account_id: &str, item_id: &str) -> Result<Vec<String>> {
        let (account, ()) = self
            .writer
            .modify(AccountKey::Id(account_id), |account| {
                account.favorites.retain(|id| id != item_id);
                Ok(())
            })
            .await?;

        Ok(account.favorites)
    }

    pub async fn cart(&self, account_id: &str) -> Result<Vec<CartEntry>> {
        Ok(self.writer.require(AccountKey::Id(account_id)).await?.cart)
    }

    pub async fn add_to_cart(&self, account_id: &str, recipe_id: &str) -> Result<Vec<CartEntry>> {
        let (account, ()) = self
            .writer
            .modify(AccountKey::Id(account_id), |account| {
                if account.has_in_cart(recipe_id) {
                    return Err(AuthError::DuplicateCartEntry);
                }
                account.cart.push(CartEntry {
                    recipe_id: recipe_id.to_string(),
                    added_at: self.clock.now(),
                });
                Ok(())
            })
            .await?;

        Ok(account.cart)
    }

    pub async fn remove_from_cart(&self, account_id: &str, recipe_id: &str) -> Result<Vec<CartEntry>> {
        let (account, ()) = self
            .writer
            .modify(AccountKey::Id(account_id), |account| {
                account.cart.retain(|entry| entry.recipe_id != recipe_id);
                Ok(())
            })
            .await?;

        Ok(account.cart)
    }

    /// Moves every cart entry into the purchase history in a single write.
    pub async fn checkout(&self, account_id: &str) -> Result<Vec<PurchaseEntry>> {
        let (account, purchased) = self
            .writer
            .modify(AccountKey::Id(account_id), |account| {
                if account.cart.is_empty() {
                    return Err(AuthError::EmptyCart);
                }

                let purchased_at = self.clock.now();
                let purchased = account.cart.len();
                account
                    .purchased_recipes
                    .extend(account.cart.drain(..).map(|entry| PurchaseEntry {
                        recipe_id: entry.recipe_id,
                        purchased_at,
                    }));
                Ok(purchased)
            })
            .await?;

        self.metrics.checkouts_total.inc();
        tracing::info!(account_id = %account.id, purchased, "checkout completed");

        Ok(account.purchased_recipes)
    }

    pub async fn purchases(&self, account_id: &str) -> Result<Vec<PurchaseEntry>> {
        Ok(self
            .writer
            .require(AccountKey::Id(account_id))
            .await?
            .purchased_recipes)
    }
}
