use serde::{Deserialize, Serialize};

use crate::modules::account::model::PurchaseEntry;

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub item_id: String,
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub message: &'static str,
    pub favorites: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CartRequest {
    pub recipe_id: String,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub message: &'static str,
    pub purchased_recipes: Vec<PurchaseEntry>,
}
