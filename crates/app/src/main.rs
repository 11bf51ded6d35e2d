use anyhow::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parkit_app::config::{AppConfig, LogFormat, StoreBackend};
use parkit_app::console::ConsoleInput;
use parkit_app::shell;
use parkit_core::fare::FareCalculator;
use parkit_core::parking_service::ParkingService;
use parkit_core::store::memory::InMemoryStore;
use parkit_db::repositories::ParkingSpotRepo;
use parkit_db::stores::PgParkingStore;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "parkit_app=info,parkit_core=info,parkit_db=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so they do not interleave with the operator prompts.
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = AppConfig::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format);
    tracing::info!(
        car_rate = config.fare.car_rate_per_hour,
        bike_rate = config.fare.bike_rate_per_hour,
        free_hours = config.fare.free_duration_hours,
        "Loaded parkit configuration"
    );

    let calculator =
        FareCalculator::new(config.fare.clone()).context("Invalid fare configuration")?;
    let input = ConsoleInput::stdin();

    match config.store {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store");
            let store = InMemoryStore::with_default_layout();
            let service = ParkingService::new(input, store.clone(), store, calculator);
            shell::run(&service).await;
        }
        StoreBackend::Postgres { database_url } => {
            // --- Database ---
            let pool = parkit_db::create_pool(&database_url, config.db_max_connections)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            parkit_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");

            parkit_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            let spots = ParkingSpotRepo::list(&pool)
                .await
                .context("Failed to load parking spots")?;
            let free = spots.iter().filter(|s| s.is_available).count();
            tracing::info!(total = spots.len(), free, "Parking layout loaded");

            let store = PgParkingStore::new(pool);
            let service = ParkingService::new(input, store.clone(), store, calculator);
            shell::run(&service).await;

            service.spot_store().pool().close().await;
        }
    }

    tracing::info!("Parkit shut down");
    Ok(())
}
