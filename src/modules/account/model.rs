use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietaryPreference {
    Veg,
    #[serde(rename = "Non-Veg")]
    NonVeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpiceLevel {
    Mild,
    Medium,
    Spicy,
}

/// Free-form profile attached to an account. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub dietary_preference: Option<DietaryPreference>,
    pub cooking_skills: Option<String>,
    pub cuisine: Option<String>,
    pub spice_level: Option<SpiceLevel>,
    pub favorite_recipes: Vec<String>,
    pub allergic: Option<String>,
    pub diagnosed_with: Option<String>,
}

/// Partial profile update. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub dietary_preference: Option<DietaryPreference>,
    pub cooking_skills: Option<String>,
    pub cuisine: Option<String>,
    pub spice_level: Option<SpiceLevel>,
    pub favorite_recipes: Option<Vec<String>>,
    pub allergic: Option<String>,
    pub diagnosed_with: Option<String>,
}

impl ProfileUpdate {
    pub fn apply_to(self, profile: &mut Profile) {
        fn set<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        set(&mut profile.first_name, self.first_name);
        set(&mut profile.last_name, self.last_name);
        set(&mut profile.phone, self.phone);
        set(&mut profile.gender, self.gender);
        set(&mut profile.country, self.country);
        set(&mut profile.state, self.state);
        set(&mut profile.dietary_preference, self.dietary_preference);
        set(&mut profile.cooking_skills, self.cooking_skills);
        set(&mut profile.cuisine, self.cuisine);
        set(&mut profile.spice_level, self.spice_level);
        set(&mut profile.allergic, self.allergic);
        set(&mut profile.diagnosed_with, self.diagnosed_with);
        if let Some(recipes) = self.favorite_recipes {
            profile.favorite_recipes = recipes;
        }
    }
}

/// A one-time code issued for email verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpEntry {
    pub code: String,
    pub device_id: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "flag")]
    pub verified: bool,
}

impl OtpEntry {
    /// Unconsumed and strictly before expiry.
    pub fn is_redeemable(&self, code: &str, now: DateTime<Utc>) -> bool {
        !self.verified && self.code == code && now < self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub recipe_id: String,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseEntry {
    pub recipe_id: String,
    pub purchased_at: DateTime<Utc>,
}

/// The account document. Persisted whole; `revision` guards concurrent writers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "flag")]
    pub verified: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_logged_in: bool,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub otps: Vec<OtpEntry>,
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub cart: Vec<CartEntry>,
    #[serde(default)]
    pub purchased_recipes: Vec<PurchaseEntry>,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(
        id: String,
        email: String,
        username: String,
        password_hash: String,
        profile: Profile,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            username,
            password_hash,
            role: Role::User,
            verified: false,
            is_logged_in: false,
            device_id: None,
            refresh_token: None,
            otps: Vec::new(),
            favorites: Vec::new(),
            cart: Vec::new(),
            purchased_recipes: Vec::new(),
            profile,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_in_cart(&self, recipe_id: &str) -> bool {
        self.cart.iter().any(|entry| entry.recipe_id == recipe_id)
    }

    /// Drops the device binding and refresh token.
    pub fn clear_session(&mut self) {
        self.is_logged_in = false;
        self.device_id = None;
        self.refresh_token = None;
    }
}

/// Redacted view handed to callers: no password hash, refresh token or OTP codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicAccount {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub verified: bool,
    pub is_logged_in: bool,
    pub device_id: Option<String>,
    pub profile: Profile,
    pub favorites: Vec<String>,
    pub cart: Vec<CartEntry>,
    pub purchased_recipes: Vec<PurchaseEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for PublicAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
            role: account.role,
            verified: account.verified,
            is_logged_in: account.is_logged_in,
            device_id: account.device_id.clone(),
            profile: account.profile.clone(),
            favorites: account.favorites.clone(),
            cart: account.cart.clone(),
            purchased_recipes: account.purchased_recipes.clone(),
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

// Older documents carry boolean flags as the strings "true"/"false".
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(de::Error::invalid_value(
                Unexpected::Str(other),
                &"a boolean or the string \"true\"/\"false\"",
            )),
        },
    }
}
