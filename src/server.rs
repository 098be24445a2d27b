//! # HTTP Server
//!
//! Assembles the app router out of the generated resource routers plus the
//! auth endpoints, and runs it on a tokio TCP listener.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_routes, API_KEY_TABLE};
use crate::context::AppContext;
use crate::models::institution::{Institution, INSTITUTION_TABLE};
use crate::models::user::{User, USER_TABLE};
use crate::resource::resource_routes;

/// Every table the store must provision
pub const RESOURCE_TABLES: &[&str] = &[USER_TABLE, INSTITUTION_TABLE, API_KEY_TABLE];

/// Build the complete application router
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(resource_routes::<User>())
        .merge(resource_routes::<Institution>())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

/// Bind and serve until the process is stopped
pub async fn serve(ctx: Arc<AppContext>) -> std::io::Result<()> {
    let addr = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
