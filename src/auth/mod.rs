//! # Authentication
//!
//! Basic-auth credential resolution, Argon2id password hashing, hashed
//! API keys with a 24-hour TTL, and the signup / key-request endpoints.

pub mod api_key;
pub mod credentials;
pub mod crypto;
pub mod errors;
pub mod routes;

pub use api_key::{issue_api_key, lookup_api_key, ApiKey, API_KEY_TABLE};
pub use credentials::{authenticate, authenticate_password, find_user_by_email};
pub use crypto::PasswordPolicy;
pub use errors::{AuthError, AuthResult};
pub use routes::auth_routes;
