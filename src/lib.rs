//! restbase - a generic, permission-checked REST resource layer
//!
//! Given a data-model type implementing [`resource::Resource`], restbase
//! generates the full set of CRUD endpoints for it: role-checked listing,
//! tiered serialization, payload validation, lifecycle hooks, and soft
//! deletes. Persistence is delegated to a pluggable [`store::Store`]
//! (sqlx/SQLite in production, in-memory for tests).

pub mod auth;
pub mod cli;
pub mod config;
pub mod context;
pub mod mail;
pub mod models;
pub mod resource;
pub mod server;
pub mod store;
