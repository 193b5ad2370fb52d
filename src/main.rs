mod api;
mod app_state;
mod db;
mod env_config;
mod layers;
mod logger;
mod services;
mod utils;

use app_state::models::AppState;
use axum::{Router, routing::get};
use db::postgres::postgres_service::PostgresService;
use env_config::error::ConfigError;
use env_config::models::{app_config::AppConfig, app_env::AppEnv, app_setting::AppSettings};
use layers::{create_cors, create_trace};
use services::indicators::scheduler::IndicatorsScheduler;
use std::{net::SocketAddr, process, sync::Arc};
use tokio::{net::TcpListener, signal};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    let settings: Arc<AppSettings> = match initialize_application() {
        Ok(settings) => Arc::new(settings),
        Err(err) => {
            eprintln!("Failed to start: {}", err);
            process::exit(1);
        }
    };

    let server_address: SocketAddr = match format!(
        "{}:{}",
        settings.app_env.server_address, settings.app_env.server_port,
    )
    .parse()
    {
        Ok(addr) => addr,
        Err(err) => {
            error!("Invalid server address configuration: {}", err);
            process::exit(1);
        }
    };

    let postgres_service = match PostgresService::new(&settings).await {
        Ok(service) => service,
        Err(err) => {
            error!("Failed to connect to PostgreSQL: {}", err);
            process::exit(1);
        }
    };

    let app_state = Arc::new(AppState::new(settings.clone(), Arc::new(postgres_service)));

    let scheduler = IndicatorsScheduler::new(app_state.clone());
    let scheduler_handle = scheduler.start();

    let app_router = create_application_router(app_state.clone());

    if let Err(err) = start_http_server(app_router, server_address).await {
        error!("Server error: {}", err);
    }

    if let Some(handle) = scheduler_handle {
        handle.abort();
    }

    info!("Spectra analyzer stopped");
}

/// Reads configuration and sets up logging.
fn initialize_application() -> Result<AppSettings, ConfigError> {
    let environment = AppEnv::new()?;
    let config = AppConfig::new(&environment.env)?;
    let app_settings = AppSettings {
        app_config: config,
        app_env: environment,
    };

    if let Err(err) = logger::init_logger(
        &app_settings.app_config.log.level,
        &app_settings.app_config.log.format,
        app_settings.app_env.is_local(),
    ) {
        eprintln!("Failed to initialize logger: {}", err);
    }

    info!("Starting Spectra analyzer...");
    info!("Current environment: {}", app_settings.app_env.env);
    info!(
        "Indicators: RSI({}) MACD({}, {}, {}) from {} into {}",
        app_settings.app_config.indicators.rsi_period,
        app_settings.app_config.indicators.macd_fast,
        app_settings.app_config.indicators.macd_slow,
        app_settings.app_config.indicators.macd_signal,
        app_settings.app_config.tables.source,
        app_settings.app_config.tables.indicators,
    );

    if app_settings.app_env.is_local() {
        debug!("Configuration details: {:#?}", app_settings);
    }

    Ok(app_settings)
}

fn create_application_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api-health", get(api::health_api))
        .route("/db-health", get(api::health_db))
        .route("/indicators/status", get(api::indicators_status))
        .layer(axum::Extension(app_state))
        .layer(create_cors())
        .layer(create_trace())
}

async fn start_http_server(app: Router, addr: SocketAddr) -> std::io::Result<()> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    info!("Server started successfully, now accepting connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!("Failed to listen for shutdown signal: {}", err),
    }
}
