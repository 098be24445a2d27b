//! # Tiered Serialization
//!
//! Items render through one of two field tiers. Administrators — and
//! requesters a model grants admin rights over a particular item, such as
//! the item's owner — see the admin tier; everyone else who passes the
//! model's standard-rights check sees the standard tier.

use serde_json::{Map, Value};

use super::errors::{ApiError, ApiResult};
use super::Resource;
use crate::models::user::User;

/// Serialize a single item for the requester, or fail with Forbidden
pub fn view_one<M: Resource>(item: &M, requester: Option<&User>) -> ApiResult<Value> {
    let admin_view = match requester {
        Some(user) => user.is_administrator || item.has_admin_rights(user),
        None => false,
    };

    if admin_view {
        return render(item, M::admin_readable_fields());
    }
    if item.has_standard_rights(requester) {
        return render(item, M::standard_readable_fields());
    }
    Err(ApiError::Forbidden)
}

/// Serialize a listing, silently dropping items the requester may not see
pub fn view_many<M: Resource>(items: &[M], requester: Option<&User>) -> ApiResult<Vec<Value>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match view_one(item, requester) {
            Ok(value) => out.push(value),
            Err(ApiError::Forbidden) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

fn render<M: Resource>(item: &M, fields: &[&str]) -> ApiResult<Value> {
    let doc = serde_json::to_value(item).map_err(|e| ApiError::Internal(e.to_string()))?;
    let doc = match doc {
        Value::Object(map) => map,
        _ => return Err(ApiError::Internal("model did not serialize to an object".to_string())),
    };

    let mut out = Map::with_capacity(fields.len());
    for field in fields {
        let value = item
            .serialize_field(field)
            .or_else(|| doc.get(*field).cloned())
            .unwrap_or(Value::Null);
        out.insert(field.to_string(), value);
    }
    Ok(Value::Object(out))
}
