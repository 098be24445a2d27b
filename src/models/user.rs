//! # User Model
//!
//! Users are the only resource with an owner-sensitive tier: a user gets
//! the admin serialization of their own record, and may edit or delete
//! themselves. Listing users is restricted to administrators.
//!
//! Accounts are never created through the generic create endpoint; signup
//! lives at `/api/usersignup` so the password can be hashed and an API key
//! issued in the same request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::AppContext;
use crate::mail::EmailTemplate;
use crate::resource::errors::ApiResult;
use crate::resource::{Payload, Permissions, Resource};

pub const USER_TABLE: &str = "users";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_administrator: bool,
    pub email_confirmed: bool,
    pub wants_update_emails: bool,
    pub bio: Option<String>,
    pub zipcode: Option<String>,
    pub website: Option<String>,
    pub twitter_handle: Option<String>,
    pub last_active: Option<DateTime<Utc>>,
    pub active: bool,
    pub date_created: Option<DateTime<Utc>>,
    pub date_inactivated: Option<DateTime<Utc>>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            email: String::new(),
            password_hash: String::new(),
            is_administrator: false,
            email_confirmed: false,
            wants_update_emails: true,
            bio: None,
            zipcode: None,
            website: None,
            twitter_handle: None,
            last_active: None,
            active: true,
            date_created: Some(Utc::now()),
            date_inactivated: None,
        }
    }
}

impl User {
    /// Build an administrator account, used by the CLI
    pub fn administrator(name: &str, email: &str, password_hash: String) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            is_administrator: true,
            email_confirmed: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Resource for User {
    const NAME: &'static str = USER_TABLE;

    fn permissions() -> Permissions {
        Permissions {
            all_can_read_many: false,
            standard_can_read_many: false,
            admin_can_delete: true,
        }
    }

    fn mandatory_fields() -> &'static [&'static str] {
        &["name", "email"]
    }

    fn writeable_fields() -> &'static [&'static str] {
        // Email is set once at signup; edits to it would break the
        // unique-active-email rule credential lookup relies on.
        &[
            "name",
            "bio",
            "zipcode",
            "website",
            "twitter_handle",
            "wants_update_emails",
            "is_administrator",
        ]
    }

    fn admin_only_fields() -> &'static [&'static str] {
        // Promotion happens through the CLI, never through the API.
        &["is_administrator"]
    }

    fn standard_readable_fields() -> &'static [&'static str] {
        &[
            "id",
            "name",
            "is_administrator",
            "bio",
            "zipcode",
            "website",
            "twitter_handle",
            "last_active",
            "active",
        ]
    }

    fn admin_readable_fields() -> &'static [&'static str] {
        &[
            "id",
            "name",
            "email",
            "is_administrator",
            "email_confirmed",
            "wants_update_emails",
            "bio",
            "zipcode",
            "website",
            "twitter_handle",
            "last_active",
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

    fn has_add_rights(_payload: &Payload, _requester: Option<&User>) -> bool {
        false
    }

    fn has_admin_rights(&self, requester: &User) -> bool {
        requester.is_administrator || requester.id == self.id
    }

    fn has_delete_rights(&self, requester: &User) -> bool {
        self.has_admin_rights(requester)
    }

    async fn on_add(&mut self, ctx: &AppContext, _requester: Option<&User>) -> ApiResult<()> {
        let template = EmailTemplate::Welcome {
            name: self.name.clone(),
        };
        if let Err(e) = ctx.mailer.send(&self.email, &template).await {
            tracing::warn!(error = %e, email = %self.email, "failed to send welcome email");
        }
        Ok(())
    }

    async fn on_delete(&mut self, ctx: &AppContext, _requester: &User) -> ApiResult<()> {
        let template = EmailTemplate::AccountDeleted {
            name: self.name.clone(),
        };
        if let Err(e) = ctx.mailer.send(&self.email, &template).await {
            tracing::warn!(error = %e, email = %self.email, "failed to send deletion email");
        }
        Ok(())
    }
}
