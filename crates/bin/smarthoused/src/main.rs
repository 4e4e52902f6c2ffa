//! # smarthoused
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Load the house, seeding an empty database on first start
//! - Construct the store adapters and the [`SmartHouseService`] facade
//! - Build the axum router and serve until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod seed;

use smarthouse_adapter_http_axum::router;
use smarthouse_adapter_http_axum::state::AppState;
use smarthouse_adapter_storage_sqlite_sqlx::{
    SqliteActuatorStateStore, SqliteHouseRepository, SqliteMeasurementStore,
};
use smarthouse_app::ports::HouseRepository;
use smarthouse_app::services::house_service::SmartHouseService;
use smarthouse_domain::house::House;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, HouseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = smarthouse_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // House
    let house = load_house(&config.house, &SqliteHouseRepository::new(pool.clone())).await?;
    let summary = house.summary();
    tracing::info!(
        name = house.name(),
        floors = summary.no_floors,
        rooms = summary.no_rooms,
        devices = summary.registered_devices,
        "house loaded"
    );

    // Services
    let service = SmartHouseService::new(
        house,
        SqliteMeasurementStore::new(pool.clone()),
        SqliteActuatorStateStore::new(pool),
    );

    // HTTP
    let app = router::build(AppState::new(service));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "smarthoused listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("smarthoused stopped");
    Ok(())
}

/// Load the stored house, or create and store one on first start.
async fn load_house(
    config: &HouseConfig,
    repo: &impl HouseRepository,
) -> Result<House, Box<dyn std::error::Error>> {
    if let Some(house) = repo.load().await? {
        return Ok(house);
    }

    let house = match &config.seed {
        Some(path) => {
            tracing::info!(path = %path.display(), "seeding house from file");
            seed::load(path)?
        }
        None => {
            tracing::warn!("no house stored and no seed file configured, starting empty");
            House::builder().name(&config.name).build()?
        }
    };
    repo.save(&house).await?;
    Ok(house)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
