//! Art restoration ledger service — entry point.
//!
//! Holds a single in-memory `LedgerStore` behind the configured policy and
//! exposes it over a small Axum REST API. The ledger hands every applied
//! mutation to the journal, which a background task appends to SQLite.

mod api;
mod config;
mod db;
mod errors;
mod journal;


use std::sync::Arc;

use art_restoration::{policy::policy_by_name, GuardedLedger, LedgerStore};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use errors::ApiError;
use journal::Journal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    // Journal database and its writer task.
    let pool = db::init_pool(&config.database_url).await?;
    let (journal, _writer) = Journal::spawn(pool.clone(), config.journal_buffer);

    // ─── Ledger ───────────────────────────────────────────
    let policy = policy_by_name(&config.ledger_policy).ok_or_else(|| {
        ApiError::Config(format!("Unknown ledger policy {:?}", config.ledger_policy))
    })?;
    info!("Ledger policy: {}", policy.name());
    let ledger =
        GuardedLedger::new(Arc::new(LedgerStore::new()), policy).with_sink(Arc::new(journal));

    // ─── REST API ─────────────────────────────────────────
    let api_state = Arc::new(api::ApiState { ledger, pool });

    let app = api::router(api_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
