//! # Requester Resolution
//!
//! Every handler runs the incoming request through [`authenticate`]. A
//! missing Authorization header means an anonymous requester; a present
//! one must resolve to an active user or the request fails with 401.
//!
//! Basic credentials carry either `email:password` or an API key with the
//! literal `api_key` in the other slot, matching how browser clients stash
//! a key after signup.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::api_key::lookup_api_key;
use super::crypto::verify_password;
use super::errors::AuthError;
use crate::context::AppContext;
use crate::models::user::{User, USER_TABLE};
use crate::resource::decode;
use crate::resource::errors::ApiResult;
use crate::resource::filter::{FilterExpr, FilterSet};

/// Marker that tells one Basic-auth slot to read the other as an API key
const API_KEY_SENTINEL: &str = "api_key";

/// Resolve the requester, if any
pub async fn authenticate(ctx: &AppContext, headers: &HeaderMap) -> ApiResult<Option<User>> {
    let (username, password) = match parse_basic(headers)? {
        Some(parts) => parts,
        None => return Ok(None),
    };

    let user = if password == API_KEY_SENTINEL {
        lookup_api_key(ctx, &username).await?
    } else if username == API_KEY_SENTINEL {
        lookup_api_key(ctx, &password).await?
    } else {
        authenticate_password(ctx, &username, &password).await?
    };
    Ok(Some(user))
}

/// Resolve email and password to an active user
pub async fn authenticate_password(
    ctx: &AppContext,
    email: &str,
    password: &str,
) -> ApiResult<User> {
    let user = find_user_by_email(ctx, email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;
    if !user.active {
        return Err(AuthError::InvalidCredentials.into());
    }
    if !verify_password(password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }
    Ok(user)
}

/// Resolve an email to its active account
///
/// Soft-deleted accounts are invisible here: their credentials no longer
/// work and their email is free to register again.
pub async fn find_user_by_email(ctx: &AppContext, email: &str) -> ApiResult<Option<User>> {
    let filters = FilterSet::new()
        .and(FilterExpr::eq("email", email))
        .and(FilterExpr::eq("active", "true"));
    let records = ctx.store.select(USER_TABLE, &filters).await?;
    match records.into_iter().next() {
        Some(record) => Ok(Some(decode(record)?)),
        None => Ok(None),
    }
}

/// Require email and password credentials on the request
pub fn parse_credentials_for_key(headers: &HeaderMap) -> ApiResult<(String, String)> {
    match parse_basic(headers)? {
        Some((email, password)) if email != API_KEY_SENTINEL && password != API_KEY_SENTINEL => {
            Ok((email, password))
        }
        _ => Err(AuthError::InvalidCredentials.into()),
    }
}

/// Pull the username and password out of a Basic Authorization header
fn parse_basic(headers: &HeaderMap) -> ApiResult<Option<(String, String)>> {
    let header = match headers.get(AUTHORIZATION) {
        Some(value) => value,
        None => return Ok(None),
    };
    let header = header.to_str().map_err(|_| AuthError::InvalidCredentials)?;
    let encoded = header
        .strip_prefix("Basic ")
        .ok_or(AuthError::InvalidCredentials)?;
    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::InvalidCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidCredentials)?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::InvalidCredentials)?;
    Ok(Some((username.to_string(), password.to_string())))
}
