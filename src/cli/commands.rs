//! CLI command implementations.

use std::sync::Arc;

use crate::auth::crypto::hash_password;
use crate::auth::AuthError;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::mail::{DisabledEmailSender, EmailSender, SmtpEmailSender};
use crate::models::user::{User, USER_TABLE};
use crate::resource::filter::{FilterExpr, FilterSet};
use crate::server;
use crate::store::{SqliteStore, Store};

use super::args::Command;
use super::errors::{CliError, CliResult};

pub async fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Serve {
            bind,
            port,
            database,
        } => serve(bind, port, database).await,
        Command::CreateAdmin {
            name,
            email,
            password,
            database,
        } => create_admin(&name, &email, &password, database).await,
    }
}

pub async fn serve(
    bind: Option<String>,
    port: Option<u16>,
    database: Option<String>,
) -> CliResult<()> {
    let mut config = AppConfig::from_env();
    if let Some(bind) = bind {
        config.bind_address = bind;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(database) = database {
        config.database_url = database;
    }

    let store = SqliteStore::connect(&config.database_url, server::RESOURCE_TABLES).await?;

    let mailer: Arc<dyn EmailSender> = if config.email.enabled {
        Arc::new(SmtpEmailSender::new(config.email.clone())?)
    } else {
        Arc::new(DisabledEmailSender)
    };

    let ctx = Arc::new(AppContext::new(Arc::new(store), mailer, config));
    server::serve(ctx).await?;
    Ok(())
}

pub async fn create_admin(
    name: &str,
    email: &str,
    password: &str,
    database: Option<String>,
) -> CliResult<()> {
    let mut config = AppConfig::from_env();
    if let Some(database) = database {
        config.database_url = database;
    }
    config.password_policy.validate(password)?;

    let store = SqliteStore::connect(&config.database_url, server::RESOURCE_TABLES).await?;

    let filters = FilterSet::new().and(FilterExpr::eq("email", email));
    if !store.select(USER_TABLE, &filters).await?.is_empty() {
        return Err(AuthError::EmailAlreadyExists.into());
    }

    let user = User::administrator(name, email, hash_password(password)?);
    let doc = serde_json::to_value(&user).map_err(|e| CliError::Invalid(e.to_string()))?;
    let id = store.insert(USER_TABLE, &doc).await?;

    println!("created administrator {} (id {})", email, id);
    Ok(())
}
