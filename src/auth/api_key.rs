//! # API Keys
//!
//! Keys are 256-bit random tokens handed to the client once, at signup or
//! on request. Only the SHA-256 hash is stored, alongside the owning user
//! and an expiry 24 hours out.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::crypto::{generate_token, hash_token};
use super::errors::AuthError;
use crate::context::AppContext;
use crate::models::user::User;
use crate::resource::errors::{ApiError, ApiResult};
use crate::resource::filter::{FilterExpr, FilterSet};
use crate::resource::decode;

/// Storage table for issued keys
pub const API_KEY_TABLE: &str = "secrets";

/// Key lifetime
pub const API_KEY_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKey {
    pub id: i64,
    pub key_hash: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
}

impl Default for ApiKey {
    fn default() -> Self {
        Self {
            id: 0,
            key_hash: String::new(),
            user_id: 0,
            expires_at: Utc::now(),
            active: true,
        }
    }
}

/// Mint a key for the user and return the raw token
pub async fn issue_api_key(ctx: &AppContext, user_id: i64) -> ApiResult<String> {
    let token = generate_token();
    let key = ApiKey {
        key_hash: hash_token(&token),
        user_id,
        expires_at: Utc::now() + Duration::hours(API_KEY_TTL_HOURS),
        ..Default::default()
    };

    let doc = serde_json::to_value(&key).map_err(|e| ApiError::Internal(e.to_string()))?;
    ctx.store.insert(API_KEY_TABLE, &doc).await?;
    Ok(token)
}

/// Resolve a raw token to its owner
///
/// Unknown tokens read as bad credentials rather than anything more
/// specific; expired ones get their own error so clients know to request
/// a fresh key.
pub async fn lookup_api_key(ctx: &AppContext, token: &str) -> ApiResult<User> {
    let filters = FilterSet::new()
        .and(FilterExpr::eq("key_hash", hash_token(token)))
        .and(FilterExpr::eq("active", "true"));
    let records = ctx.store.select(API_KEY_TABLE, &filters).await?;
    let record = records
        .into_iter()
        .next()
        .ok_or(AuthError::InvalidCredentials)?;
    let key: ApiKey = serde_json::from_value(record.data)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if key.expires_at < Utc::now() {
        return Err(AuthError::ApiKeyExpired.into());
    }

    let record = ctx
        .store
        .fetch(crate::models::user::USER_TABLE, key.user_id)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;
    let user: User = decode(record)?;
    if !user.active {
        return Err(AuthError::InvalidCredentials.into());
    }
    Ok(user)
}
