use std::sync::Arc;

use dioxus_logger::tracing;
use valkyrie::{
    config::Config,
    error::Error,
    scheduler::Scheduler,
    service::{
        engine::Engine,
        fetcher::Fetcher,
        reference::{CachedResolver, EsiResolver},
    },
    startup,
    store::{StoreKeys, ValkeyStore},
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = dioxus_logger::init(config.log_level) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = run(config).await {
        tracing::error!("Valkyrie stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Error> {
    let esi_client = startup::build_esi_client(&config)?;
    let http_client = startup::build_http_client(&config)?;
    let pool = startup::connect_to_valkey(&config).await?;

    let store = Arc::new(ValkeyStore::new(pool));
    let keys = StoreKeys::new(&config.store_prefix);
    let resolver = Arc::new(CachedResolver::new(EsiResolver::new(
        esi_client,
        http_client.clone(),
        &config.esi_url,
    )));

    let engine = Arc::new(Engine::new(
        Arc::clone(&store),
        resolver,
        config.engine(),
        keys.clone(),
    ));
    let fetcher = Arc::new(Fetcher::new(store, http_client, config.fetcher(), keys));

    let mut scheduler = Scheduler::new(engine, fetcher).await?;
    scheduler.start().await?;

    tracing::info!(
        "Valkyrie started (engine {}, fetcher {})",
        if config.engine_active { "active" } else { "inactive" },
        if config.fetcher_active { "active" } else { "inactive" }
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for the shutdown signal: {}", e);
    }

    tracing::info!("Shutting down");
    scheduler.shutdown().await
}
