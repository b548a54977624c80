use anyhow::Context;
use clap::Parser;
use hospital_capacity::app::{self, Services};
use hospital_capacity::broadcast::InProcessBroker;
use hospital_capacity::config::Config;
use hospital_capacity::hospital::types::Hospital;
use hospital_capacity::queue;
use hospital_capacity::store::{MemoryStore, Store};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.validate()?;

    // 1. Store:
    let store = Arc::new(MemoryStore::new());
    if let Some(seed) = &config.seed {
        let loaded = load_seed(store.as_ref(), seed).await?;
        tracing::info!("Loaded {} hospitals from {}", loaded, seed.display());
    }

    // 2. Services:
    let broker = Arc::new(InProcessBroker::new(config.broadcast_capacity));
    let services = Services::new(
        store,
        broker,
        config.page_limits(),
        config.queue_max_wait(),
    );

    // 3. Queue sweeper:
    queue::sweeper::start(services.queue.clone(), config.sweep_interval());

    // 4. HTTP Router:
    let router = app::router(&services);

    // 5. Start HTTP server:
    tracing::info!("HTTP server listening on {}", config.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Inserts every hospital in the JSON array at `path`. A repeated id aborts start-up.
async fn load_seed(store: &MemoryStore, path: &Path) -> anyhow::Result<usize> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let hospitals: Vec<Hospital> = serde_json::from_str(&raw)
        .with_context(|| format!("seed file {} is not a hospital array", path.display()))?;

    let count = hospitals.len();
    for hospital in hospitals {
        let id = hospital.id.clone();
        hospital
            .beds
            .validate()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("seed hospital {} has invalid bed counts", id))?;
        store
            .insert_hospital(hospital)
            .await
            .with_context(|| format!("failed to seed hospital {}", id))?;
    }
    Ok(count)
}
