//! TrainTracker Backend Server
//!
//! REST API server for simulated train fares and tech product prices.

use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use traintracker_backend::api::{create_router, with_frontend};
use traintracker_backend::catalog::{Catalog, InstrumentListing};
use traintracker_backend::config::Config;
use traintracker_backend::error::ErrorResponse;
use traintracker_backend::series::Sample;
use traintracker_backend::state::AppState;
use traintracker_backend::summary::Summary;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use traintracker_backend::models::{
    HealthResponse, ProductSummaryResponse, RouteSummaryResponse, SummaryBatchResponse,
};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        traintracker_backend::api::handlers::health_check,
        traintracker_backend::api::handlers::list_routes,
        traintracker_backend::api::handlers::get_train,
        traintracker_backend::api::handlers::get_trains_batch,
        traintracker_backend::api::handlers::list_products,
        traintracker_backend::api::handlers::get_tech_all,
        traintracker_backend::api::handlers::get_tech,
    ),
    components(
        schemas(
            HealthResponse,
            Catalog,
            InstrumentListing,
            Sample,
            Summary,
            RouteSummaryResponse,
            ProductSummaryResponse,
            SummaryBatchResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Trains", description = "Train route fares"),
        (name = "Tech", description = "Tech product prices"),
    ),
    info(
        title = "TrainTracker API",
        version = "0.1.0",
        description = "REST API serving simulated train fare and tech product price histories",
        license(name = "MIT"),
        contact(name = "Joaquin Bejar", email = "jb@taunais.com")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let host = config.server.host.clone();
    let port = config.server.port;
    let static_dir = config.server.static_dir.clone();

    // Create application state and start the refresh loop
    let state = Arc::new(AppState::from_config(config)?);
    let simulation = Arc::clone(&state.simulator).spawn();

    info!("Starting TrainTracker Backend on {}:{}", host, port);
    info!(
        "Swagger UI available at http://{}:{}/swagger-ui/",
        host, port
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = create_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    let app = with_frontend(app, &static_dir)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // Start the server
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!("TrainTracker running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    simulation.stop().await;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, stopping"),
        Err(err) => {
            warn!("Failed to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
