//! # Generic Resource Layer
//!
//! The [`Resource`] trait is the contract a data model implements to get a
//! full set of CRUD endpoints generated for it: field tiers for
//! serialization, a writeable-field allow-list for payloads, per-model
//! permission hooks, and lifecycle hooks that run inside create, update,
//! and delete.

pub mod errors;
pub mod filter;
pub mod query;
pub mod response;
pub mod routes;
pub mod serializer;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::AppContext;
use crate::models::user::User;

pub use errors::{ApiError, ApiResult};
pub use filter::{FilterExpr, FilterOperator, FilterSet};
pub use routes::resource_routes;

/// A JSON request payload
pub type Payload = Map<String, Value>;

/// Listing permissions for a resource
#[derive(Debug, Clone, Copy)]
pub struct Permissions {
    /// Anonymous requesters may list
    pub all_can_read_many: bool,

    /// Authenticated non-admins may list
    pub standard_can_read_many: bool,

    /// Administrators may delete items they don't own
    pub admin_can_delete: bool,
}

/// A model exposed through generated CRUD routes
#[async_trait]
pub trait Resource:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// URL segment and storage table name
    const NAME: &'static str;

    fn permissions() -> Permissions;

    /// Fields a create payload must contain
    fn mandatory_fields() -> &'static [&'static str];

    /// The only fields a payload may set
    fn writeable_fields() -> &'static [&'static str];

    /// Fields stripped from every payload, whoever sends it
    fn admin_only_fields() -> &'static [&'static str] {
        &[]
    }

    /// Serialization tier for ordinary requesters
    fn standard_readable_fields() -> &'static [&'static str];

    /// Serialization tier for administrators and item owners
    fn admin_readable_fields() -> &'static [&'static str];

    /// Fields the query-filter parser accepts
    fn filterable_fields() -> &'static [&'static str] {
        Self::standard_readable_fields()
    }

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    fn is_active(&self) -> bool;

    /// Soft-delete: clear the active flag and stamp the deactivation time
    fn deactivate(&mut self);

    // ==================
    // Permission Hooks
    // ==================

    /// Whether the requester may create an item from this payload
    fn has_add_rights(_payload: &Payload, _requester: Option<&User>) -> bool {
        false
    }

    /// Whether the requester may see the standard serialization
    fn has_standard_rights(&self, _requester: Option<&User>) -> bool {
        true
    }

    /// Whether the requester may edit the item (and see the admin tier)
    fn has_admin_rights(&self, requester: &User) -> bool {
        requester.is_administrator
    }

    /// Whether the requester may delete the item
    fn has_delete_rights(&self, requester: &User) -> bool {
        requester.is_administrator && Self::permissions().admin_can_delete
    }

    // ==================
    // Serialization
    // ==================

    /// Per-field override consulted before the plain serde value
    fn serialize_field(&self, _field: &str) -> Option<Value> {
        None
    }

    /// Build a new item from a create payload
    ///
    /// Checks mandatory fields, then deserializes the writeable subset of
    /// the payload over the model's defaults. Admin-only fields never make
    /// it through, whatever the payload contains.
    fn from_payload(payload: &Payload) -> ApiResult<Self> {
        for field in Self::mandatory_fields() {
            if !payload.contains_key(*field) {
                return Err(ApiError::Validation(format!(
                    "missing mandatory field: {}",
                    field
                )));
            }
        }

        let mut doc = Map::new();
        for field in Self::writeable_fields() {
            if Self::admin_only_fields().contains(field) {
                continue;
            }
            if let Some(value) = payload.get(*field) {
                doc.insert(field.to_string(), value.clone());
            }
        }

        serde_json::from_value(Value::Object(doc)).map_err(|e| ApiError::Validation(e.to_string()))
    }

    /// Apply an update payload to this item
    ///
    /// Returns whether anything actually changed, which feeds the
    /// `unchanged` flag of [`Resource::on_edit`].
    fn apply_payload(&mut self, payload: &Payload) -> ApiResult<bool> {
        let mut doc = serde_json::to_value(self.clone())
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let obj = doc
            .as_object_mut()
            .ok_or_else(|| ApiError::Internal("model did not serialize to an object".to_string()))?;

        let mut changed = false;
        for field in Self::writeable_fields() {
            if Self::admin_only_fields().contains(field) {
                continue;
            }
            if let Some(value) = payload.get(*field) {
                if obj.get(*field) != Some(value) {
                    changed = true;
                }
                obj.insert(field.to_string(), value.clone());
            }
        }

        *self = serde_json::from_value(doc).map_err(|e| ApiError::Validation(e.to_string()))?;
        Ok(changed)
    }

    // ==================
    // Lifecycle Hooks
    // ==================

    /// Runs after the item is first persisted; mutations are saved again
    async fn on_add(&mut self, _ctx: &AppContext, _requester: Option<&User>) -> ApiResult<()> {
        Ok(())
    }

    /// Runs after an update payload is applied, before persisting
    async fn on_edit(
        &mut self,
        _ctx: &AppContext,
        _requester: &User,
        _unchanged: bool,
    ) -> ApiResult<()> {
        Ok(())
    }

    /// Runs after the item is deactivated, before persisting
    async fn on_delete(&mut self, _ctx: &AppContext, _requester: &User) -> ApiResult<()> {
        Ok(())
    }
}

/// Decode a stored record into a model
pub(crate) fn decode<M: Resource>(record: crate::store::StoredRecord) -> ApiResult<M> {
    let mut item: M =
        serde_json::from_value(record.data).map_err(|e| ApiError::Internal(e.to_string()))?;
    item.set_id(record.id);
    Ok(item)
}

/// Serialize a model for storage
pub(crate) fn to_doc<M: Resource>(item: &M) -> ApiResult<Value> {
    serde_json::to_value(item).map_err(|e| ApiError::Internal(e.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Ad-hoc resource used across the layer's unit tests.

    use super::*;
    use chrono::{DateTime, Utc};
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Thing {
        pub id: i64,
        pub name: String,
        pub zipcode: Option<String>,
        pub rating: i64,
        pub secret: bool,
        pub active: bool,
        pub date_inactivated: Option<DateTime<Utc>>,
        pub last_edit_unchanged: Option<bool>,
    }

    impl Default for Thing {
        fn default() -> Self {
            Self {
                id: 0,
                name: String::new(),
                zipcode: None,
                rating: 0,
                secret: false,
                active: true,
                date_inactivated: None,
                last_edit_unchanged: None,
            }
        }
    }

    #[async_trait]
    impl Resource for Thing {
        const NAME: &'static str = "things";

        fn permissions() -> Permissions {
            Permissions {
                all_can_read_many: true,
                standard_can_read_many: true,
                admin_can_delete: true,
            }
        }

        fn mandatory_fields() -> &'static [&'static str] {
            &["name"]
        }

        fn writeable_fields() -> &'static [&'static str] {
            &["name", "zipcode", "rating", "secret"]
        }

        fn admin_only_fields() -> &'static [&'static str] {
            &["secret"]
        }

        fn standard_readable_fields() -> &'static [&'static str] {
            &["id", "name", "zipcode", "active"]
        }

        fn admin_readable_fields() -> &'static [&'static str] {
            &["id", "name", "zipcode", "rating", "secret", "active"]
        }

        fn id(&self) -> i64 {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = id;
        }

        fn is_active(&self) -> bool {
            self.active
        }

        fn deactivate(&mut self) {
            self.active = false;
            self.date_inactivated = Some(Utc::now());
        }

        fn has_add_rights(_payload: &Payload, requester: Option<&User>) -> bool {
            requester.is_some()
        }

        fn has_standard_rights(&self, _requester: Option<&User>) -> bool {
            !self.secret
        }

        fn serialize_field(&self, field: &str) -> Option<Value> {
            // Zipcodes render trimmed.
            match field {
                "zipcode" => self.zipcode.as_ref().map(|z| Value::from(z.trim())),
                _ => None,
            }
        }

        async fn on_edit(
            &mut self,
            _ctx: &AppContext,
            _requester: &User,
            unchanged: bool,
        ) -> ApiResult<()> {
            self.last_edit_unchanged = Some(unchanged);
            Ok(())
        }
    }

    pub fn payload(value: Value) -> Payload {
        value.as_object().cloned().expect("payload must be an object")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{payload, Thing};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload_requires_mandatory_fields() {
        let result = Thing::from_payload(&payload(json!({"zipcode": "02139"})));
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_from_payload_ignores_unknown_and_admin_only_fields() {
        let thing = Thing::from_payload(&payload(json!({
            "name": "widget",
            "secret": true,
            "unknown_field": "x",
            "id": 99
        })))
        .unwrap();

        assert_eq!(thing.name, "widget");
        assert!(!thing.secret, "admin-only field must never be settable");
        assert_eq!(thing.id, 0, "id is not writeable");
        assert!(thing.active, "defaults apply to unspecified fields");
    }

    #[test]
    fn test_from_payload_rejects_wrong_types() {
        let result = Thing::from_payload(&payload(json!({"name": 42})));
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_apply_payload_reports_changes() {
        let mut thing = Thing {
            name: "widget".to_string(),
            ..Default::default()
        };

        let changed = thing
            .apply_payload(&payload(json!({"name": "gadget"})))
            .unwrap();
        assert!(changed);
        assert_eq!(thing.name, "gadget");

        let changed = thing
            .apply_payload(&payload(json!({"name": "gadget"})))
            .unwrap();
        assert!(!changed, "same value is not a change");
    }

    #[test]
    fn test_apply_payload_strips_admin_only_fields() {
        let mut thing = Thing::default();
        let changed = thing.apply_payload(&payload(json!({"secret": true}))).unwrap();

        assert!(!changed);
        assert!(!thing.secret);
    }

    #[test]
    fn test_decode_syncs_id() {
        let record = crate::store::StoredRecord {
            id: 7,
            data: json!({"name": "widget"}),
        };
        let thing: Thing = decode(record).unwrap();
        assert_eq!(thing.id, 7);
        assert_eq!(thing.name, "widget");
    }
}
