//! # Generated CRUD Routes
//!
//! [`resource_routes`] builds the full endpoint set for one resource:
//!
//! - `GET    /api/{name}`       list, with query filters
//! - `POST   /api/{name}`       create
//! - `GET    /api/{name}/{id}`  fetch one
//! - `PATCH  /api/{name}/{id}`  edit
//! - `PUT    /api/{name}/{id}`  edit
//! - `DELETE /api/{name}/{id}`  soft-delete

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use super::filter::FilterExpr;
use super::query::parse_filters;
use super::response::{ItemResponse, ListResponse};
use super::serializer::{view_many, view_one};
use super::{decode, to_doc, Payload, Resource};
use crate::auth::credentials::authenticate;
use crate::context::AppContext;
use crate::models::user::User;

/// Build the router for one resource type
pub fn resource_routes<M: Resource>() -> Router<Arc<AppContext>> {
    Router::new()
        .route(
            &format!("/api/{}", M::NAME),
            get(list::<M>).post(create::<M>),
        )
        .route(
            &format!("/api/{}/{{id}}", M::NAME),
            get(get_one::<M>)
                .patch(update::<M>)
                .put(update::<M>)
                .delete(remove::<M>),
        )
}

// ==================
// Handlers
// ==================

async fn list<M: Resource>(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> ApiResult<Json<ListResponse>> {
    let requester = authenticate(&ctx, &headers).await?;
    let perms = M::permissions();

    let is_admin = requester.as_ref().map(|u| u.is_administrator).unwrap_or(false);
    if requester.is_none() && !perms.all_can_read_many {
        return Err(ApiError::Unauthorized);
    }
    if !is_admin && !perms.standard_can_read_many && !perms.all_can_read_many {
        return Err(ApiError::Forbidden);
    }

    let mut filters = parse_filters(&params, M::filterable_fields())?;
    if !is_admin {
        // Non-admins never see soft-deleted items.
        filters.push(FilterExpr::eq("active", "true"));
    }

    let records = ctx.store.select(M::NAME, &filters).await?;
    let mut items = Vec::with_capacity(records.len());
    for record in records {
        items.push(decode::<M>(record)?);
    }

    let views = view_many(&items, requester.as_ref())?;
    Ok(Json(ListResponse::new(views)))
}

async fn get_one<M: Resource>(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<ItemResponse>> {
    let requester = authenticate(&ctx, &headers).await?;
    if requester.is_none() {
        return Err(ApiError::Unauthorized);
    }

    // A malformed id looks the same as a missing item.
    let id: i64 = id.parse().map_err(|_| ApiError::NotFound)?;

    let record = ctx
        .store
        .fetch(M::NAME, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let item: M = decode(record)?;
    if !item.is_active() {
        return Err(ApiError::NotFound);
    }

    let view = view_one(&item, requester.as_ref())?;
    Ok(Json(ItemResponse::new(view)))
}

async fn create<M: Resource>(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<Json<ItemResponse>> {
    let requester = authenticate(&ctx, &headers).await?;
    let payload = as_payload(&body)?;

    if !M::has_add_rights(payload, requester.as_ref()) {
        return match requester {
            None => Err(ApiError::Unauthorized),
            Some(_) => Err(ApiError::Forbidden),
        };
    }

    let mut item = M::from_payload(payload)?;
    let id = ctx.store.insert(M::NAME, &to_doc(&item)?).await?;
    item.set_id(id);

    item.on_add(&ctx, requester.as_ref()).await?;
    ctx.store.update(M::NAME, id, &to_doc(&item)?).await?;

    let view = view_one(&item, requester.as_ref())?;
    let user_view = requester_view(requester.as_ref())?;
    Ok(Json(ItemResponse::with_user(view, user_view)))
}

async fn update<M: Resource>(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> ApiResult<Json<ItemResponse>> {
    let requester = authenticate(&ctx, &headers).await?;
    let user = requester.as_ref().ok_or(ApiError::Unauthorized)?;

    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest("item id must be an integer".to_string()))?;
    let payload = as_payload(&body)?;
    check_body_id(payload, id)?;

    let record = ctx
        .store
        .fetch(M::NAME, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let mut item: M = decode(record)?;

    if !item.has_admin_rights(user) {
        return Err(ApiError::Forbidden);
    }

    let changed = item.apply_payload(payload)?;
    item.on_edit(&ctx, user, !changed).await?;
    ctx.store.update(M::NAME, id, &to_doc(&item)?).await?;

    let view = view_one(&item, requester.as_ref())?;
    Ok(Json(ItemResponse::new(view)))
}

async fn remove<M: Resource>(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<ItemResponse>> {
    let requester = authenticate(&ctx, &headers).await?;
    let user = requester.as_ref().ok_or(ApiError::Unauthorized)?;

    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest("item id must be an integer".to_string()))?;

    let record = ctx
        .store
        .fetch(M::NAME, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let mut item: M = decode(record)?;

    if !item.has_delete_rights(user) {
        return Err(ApiError::Forbidden);
    }

    item.deactivate();
    item.on_delete(&ctx, user).await?;
    ctx.store.update(M::NAME, id, &to_doc(&item)?).await?;

    let view = view_one(&item, requester.as_ref())?;
    Ok(Json(ItemResponse::new(view)))
}

// ==================
// Helpers
// ==================

fn as_payload(body: &Value) -> ApiResult<&Payload> {
    body.as_object()
        .ok_or_else(|| ApiError::BadRequest("request body must be a JSON object".to_string()))
}

/// A payload may carry its own id, but it must agree with the URL
fn check_body_id(payload: &Payload, id: i64) -> ApiResult<()> {
    match payload.get("id") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Number(n)) if n.as_i64() == Some(id) => Ok(()),
        Some(Value::String(s)) if s.parse::<i64>() == Ok(id) => Ok(()),
        Some(_) => Err(ApiError::BadRequest(
            "body id does not match the requested item".to_string(),
        )),
    }
}

fn requester_view(requester: Option<&User>) -> ApiResult<Option<Value>> {
    match requester {
        Some(user) => Ok(Some(view_one(user, Some(user))?)),
        None => Ok(None),
    }
}
