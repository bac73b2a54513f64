//! Record service entry-point: loads settings, probes the database and
//! serves the `/users` REST endpoints.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use record_service::domain::RecordService;
use record_service::inbound::http::health::HealthState;
use record_service::outbound::persistence::{DbPool, DieselRecordRepository};
use record_service::settings::ServiceSettings;
use server::{ServerConfig, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!(error = %err, "{context}");
    std::io::Error::other(format!("{context}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        ServiceSettings::load().map_err(|err| startup_error("failed to load settings", err))?;
    info!(settings = ?settings, "configuration loaded");

    let schema = settings
        .record_schema()
        .map_err(|err| startup_error("invalid record schema", err))?;
    let pool_config = settings
        .pool_config()
        .map_err(|err| startup_error("invalid pool settings", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("invalid listen address", err))?;

    let pool = DbPool::new(pool_config)
        .await
        .map_err(|err| startup_error("failed to build database pool", err))?;
    pool.probe()
        .await
        .map_err(|err| startup_error("database connectivity probe failed", err))?;
    info!(table = schema.table(), "connected to database");

    let schema = Arc::new(schema);
    let repository = DieselRecordRepository::new(pool, schema.clone());
    let records = RecordService::new(schema, Arc::new(repository));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, records))?;
    info!(%bind_addr, "listening");
    server.await
}
