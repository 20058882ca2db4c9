//! Coffee Service - Main Application Entry Point
//!
//! A REST API exposing create, read, update and delete operations over a
//! single collection of coffee documents.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Document Store**: PostgreSQL `JSONB` documents through sqlx
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build HTTP router with routes, tracing and CORS
//! 5. Start server on configured port

mod app;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{app::AppState, services::PgCoffeeRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // One pool for the whole process, shared by every request
    let pool = db::create_pool(&config.database_url()?, config.db_max_connections).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let state = AppState::new(
        Arc::new(PgCoffeeRepository::new(pool)),
        config.coffee_added_by.as_str(),
    );
    let app = app::router(state).layer(app::cors_layer(&config.cors_origin)?);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
