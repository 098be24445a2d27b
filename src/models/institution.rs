//! # Institution Model
//!
//! A public directory entry: anyone may browse institutions, any signed-in
//! user may add one, and only administrators may edit or delete.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::User;
use crate::resource::{Payload, Permissions, Resource};

pub const INSTITUTION_TABLE: &str = "institutions";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Institution {
    pub id: i64,
    pub name: String,
    pub institution_type: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub active: bool,
    pub date_created: Option<DateTime<Utc>>,
    pub date_inactivated: Option<DateTime<Utc>>,
}

impl Default for Institution {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            institution_type: None,
            description: None,
            website: None,
            active: true,
            date_created: Some(Utc::now()),
            date_inactivated: None,
        }
    }
}

#[async_trait]
impl Resource for Institution {
    const NAME: &'static str = INSTITUTION_TABLE;

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
        &["name", "institution_type", "description", "website"]
    }

    fn standard_readable_fields() -> &'static [&'static str] {
        &[
            "id",
            "name",
            "institution_type",
            "description",
            "website",
            "active",
        ]
    }

    fn admin_readable_fields() -> &'static [&'static str] {
        &[
            "id",
            "name",
            "institution_type",
            "description",
            "website",
            "active",
            "date_created",
            "date_inactivated",
        ]
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_signed_in_user_may_add() {
        let payload = Payload::new();
        assert!(!Institution::has_add_rights(&payload, None));
        assert!(Institution::has_add_rights(
            &payload,
            Some(&User::default())
        ));
    }

    #[test]
    fn test_only_admins_may_edit_or_delete() {
        let institution = Institution::default();
        let user = User {
            id: 1,
            ..Default::default()
        };
        let admin = User {
            id: 2,
            is_administrator: true,
            ..Default::default()
        };

        assert!(!institution.has_admin_rights(&user));
        assert!(institution.has_admin_rights(&admin));
        assert!(!institution.has_delete_rights(&user));
        assert!(institution.has_delete_rights(&admin));
    }
}
