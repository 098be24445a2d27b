//! # Application Context
//!
//! Shared services handed to every handler and lifecycle hook: the
//! document store, the mailer, and configuration. Routers carry it as
//! `Arc<AppContext>` state.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::mail::EmailSender;
use crate::store::Store;

/// Shared application services
pub struct AppContext {
    pub store: Arc<dyn Store>,
    pub mailer: Arc<dyn EmailSender>,
    pub config: AppConfig,
}

impl AppContext {
    pub fn new(store: Arc<dyn Store>, mailer: Arc<dyn EmailSender>, config: AppConfig) -> Self {
        Self {
            store,
            mailer,
            config,
        }
    }
}
