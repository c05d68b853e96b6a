use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // account id
    pub kind: TokenKind,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,        // makes two tokens minted in the same second distinct
}

/// HS256 signer. The secret is handed in by the caller, never read from the environment here.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_token_duration: Duration,
    refresh_token_duration: Duration,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_token_duration: Duration::hours(1),
            refresh_token_duration: Duration::days(7),
        }
    }

    pub fn create_access_token(&self, account_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.sign(account_id, TokenKind::Access, self.access_token_duration)
    }

    pub fn create_refresh_token(&self, account_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.sign(account_id, TokenKind::Refresh, self.refresh_token_duration)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        self.verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        self.verify(token, TokenKind::Refresh)
    }

    pub fn get_access_token_duration_secs(&self) -> i64 {
        self.access_token_duration.num_seconds()
    }

    /// Signs arbitrary claims with the service key. Lets callers build tokens
    /// with custom lifetimes, e.g. already-expired ones.
    pub fn sign_claims(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.encoding_key)
    }

    fn sign(&self, account_id: &str, kind: TokenKind, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id.to_string(),
            kind,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        self.sign_claims(&claims)
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        if data.claims.kind != expected {
            return Err(ErrorKind::InvalidToken.into());
        }
        Ok(data.claims)
    }
}
