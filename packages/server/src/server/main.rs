// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use server_core::domains::emergency::models::MatchingConfig;
use server_core::kernel::{
    BasePushDelivery, NominatimPlacesClient, NoopPushDelivery, PostgresBloodStore, ServerDeps,
};
use server_core::server::{build_app, AppState};
use server_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LifeLink Emergency Blood Matching API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Wire collaborators
    let store = Arc::new(PostgresBloodStore::new(pool.clone()));
    let places = Arc::new(NominatimPlacesClient::new(
        config.places_base_url.clone(),
        config.places_timeout_secs,
    ));
    let push_service: Arc<dyn BasePushDelivery> = match &config.expo_access_token {
        Some(token) => Arc::new(server_core::common::utils::expo::ExpoClient::new(Some(
            token.clone(),
        ))),
        None => {
            tracing::warn!("EXPO_ACCESS_TOKEN not set; push delivery disabled");
            Arc::new(NoopPushDelivery)
        }
    };

    let matching = MatchingConfig {
        default_radius_km: config.emergency_radius_km,
        ..MatchingConfig::default()
    };

    let deps = Arc::new(ServerDeps::new(store, places, push_service, matching));

    let state = AppState {
        db_pool: Some(pool),
        deps,
    };

    let app = build_app(state, config.allowed_origins.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
