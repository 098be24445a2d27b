//! # Account Endpoints
//!
//! Signup is the one way to create a user, and it hands back an API key so
//! the client can start making authenticated calls immediately. Clients
//! whose key has expired trade their password for a new one at
//! `/api/requestapikey`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::api_key::issue_api_key;
use super::credentials::{authenticate_password, find_user_by_email, parse_credentials_for_key};
use super::crypto::hash_password;
use super::errors::AuthError;
use crate::context::AppContext;
use crate::models::user::{User, USER_TABLE};
use crate::resource::errors::{ApiError, ApiResult};
use crate::resource::serializer::view_one;
use crate::resource::{to_doc, Resource};

pub fn auth_routes() -> Router<Arc<AppContext>> {
    Router::new()
        .route("/api/usersignup", post(signup))
        .route("/api/requestapikey", get(request_api_key))
}

#[derive(Debug, Serialize)]
struct SignupResponse {
    data: Value,
    #[serde(rename = "apiKey")]
    api_key: String,
}

#[derive(Debug, Serialize)]
struct ApiKeyResponse {
    #[serde(rename = "apiKey")]
    api_key: String,
}

async fn signup(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<SignupResponse>> {
    let payload = body
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("request body must be a JSON object".to_string()))?;

    let password = payload
        .get("password")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::Validation("missing mandatory field: password".to_string()))?;
    ctx.config.password_policy.validate(password)?;

    // Email is not a writeable field (it is immutable after signup), so it
    // is applied here rather than through the payload.
    let email = payload
        .get("email")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::Validation("missing mandatory field: email".to_string()))?;

    let mut user = User::from_payload(payload)?;
    user.email = email.to_string();
    if find_user_by_email(&ctx, &user.email).await?.is_some() {
        return Err(AuthError::EmailAlreadyExists.into());
    }
    user.password_hash = hash_password(password)?;

    let id = ctx.store.insert(USER_TABLE, &to_doc(&user)?).await?;
    user.set_id(id);
    user.on_add(&ctx, None).await?;
    ctx.store.update(USER_TABLE, id, &to_doc(&user)?).await?;

    let api_key = issue_api_key(&ctx, id).await?;
    let data = view_one(&user, Some(&user))?;
    Ok(Json(SignupResponse { data, api_key }))
}

/// Trade email and password for a fresh key
///
/// Keys themselves are not accepted here; an expired key holder has to
/// present the password again.
async fn request_api_key(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiKeyResponse>> {
    let (email, password) = parse_credentials_for_key(&headers)?;
    let mut user = authenticate_password(&ctx, &email, &password).await?;

    user.last_active = Some(Utc::now());
    ctx.store
        .update(USER_TABLE, user.id(), &to_doc(&user)?)
        .await?;

    let api_key = issue_api_key(&ctx, user.id()).await?;
    Ok(Json(ApiKeyResponse { api_key }))
}
