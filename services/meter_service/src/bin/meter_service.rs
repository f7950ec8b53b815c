//! services/meter_service/src/bin/meter_service.rs

use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::Router;
use meter_service_lib::{
    adapters::{
        ChatFormattingAdapter, LogNotificationAdapter, LogSpreadsheetAdapter, SqliteKeyValueStore,
    },
    config::Config,
    error::ApiError,
    web::{build_router, rest::ApiDoc, AppState},
};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open Local Storage & Run Migrations ---
    info!("Opening local storage at {}", config.database_url);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(SqliteKeyValueStore::new(pool));
    info!("Running storage migrations...");
    store.run_migrations().await?;
    info!("Storage migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let mut http = reqwest::Client::builder();
    if let Some(timeout) = config.formatting_timeout {
        http = http.timeout(timeout);
    }
    let http = http.build()?;
    let formatter = Arc::new(ChatFormattingAdapter::new(
        http,
        config.formatting_endpoint.clone(),
        config.formatting_model.clone(),
        config.formatting_prompt.clone(),
        config.formatting_api_key.clone(),
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(
        AppState::new(
            store,
            formatter,
            Arc::new(LogSpreadsheetAdapter),
            Arc::new(LogNotificationAdapter),
        )
        .await?,
    );
    {
        let controller = app_state.controller.lock().await;
        info!(
            registered = controller.user().is_some(),
            state = ?controller.session_state(),
            "Restored local state"
        );
    }

    // --- 5. Create the Web Router ---
    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(build_router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
