//! # Configuration
//!
//! Defaults first, environment second, CLI flags last. `from_env` never
//! fails: unset or unparseable variables fall back to the defaults so a
//! bare `restbase serve` always starts.

use std::env;

use crate::auth::PasswordPolicy;
use crate::mail::EmailConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind
    pub bind_address: String,

    /// Port to listen on
    pub port: u16,

    /// SQLite database URL
    pub database_url: String,

    pub email: EmailConfig,

    pub password_policy: PasswordPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            database_url: "sqlite://restbase.db".to_string(),
            email: EmailConfig::default(),
            password_policy: PasswordPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let email_defaults = defaults.email.clone();

        Self {
            bind_address: var_or("RESTBASE_BIND", defaults.bind_address),
            port: parsed_var_or("RESTBASE_PORT", defaults.port),
            database_url: var_or("DATABASE_URL", defaults.database_url),
            email: EmailConfig {
                enabled: parsed_var_or("SMTP_ENABLED", email_defaults.enabled),
                smtp_host: var_or("SMTP_HOST", email_defaults.smtp_host),
                smtp_port: parsed_var_or("SMTP_PORT", email_defaults.smtp_port),
                smtp_user: var_or("SMTP_USER", email_defaults.smtp_user),
                smtp_password: var_or("SMTP_PASSWORD", email_defaults.smtp_password),
                from_email: var_or("SMTP_FROM_EMAIL", email_defaults.from_email),
                from_name: var_or("SMTP_FROM_NAME", email_defaults.from_name),
            },
            password_policy: defaults.password_policy,
        }
    }
}

fn var_or(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

fn parsed_var_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
