//! # Shipped Models
//!
//! The resources this server exposes out of the box. Adding a new one
//! means implementing [`crate::resource::Resource`] and registering it in
//! [`crate::server::build_router`].

pub mod institution;
pub mod user;

pub use institution::Institution;
pub use user::User;
