use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use tracing::{info, error, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use std::panic;

use colabsheet::config::{self, Config};
use colabsheet::db::dbsheets;
use colabsheet::docs::ApiDoc;
use colabsheet::routes::api::create_api_routes;
use colabsheet::ws::handler::websocket_handler;
use colabsheet::ws::hub::CollabHub;

#[tokio::main(flavor = "current_thread")]
async fn main() {

    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "colabsheet=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let cfg = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });
    config::init_config(cfg.clone());

    // Initialize database connection if URL is provided
    if let Some(db_url) = &cfg.db_url {
        match dbsheets::init_db(db_url).await {
            Ok(_) => info!("Database initialized successfully"),
            Err(e) => {
                error!("Failed to initialize database: {}", e);
                warn!("Spreadsheet API endpoints will not be available");
            }
        }
    } else {
        warn!("No database URL configured - spreadsheet API endpoints will not be available");
    }

    // Start the collaboration hub event loop
    let hub = CollabHub::spawn();

    // Create API routes
    let api_routes = create_api_routes(hub.clone());

    // Combine all routes
    let app_routes = Router::new()
        // Mount the collaboration WebSocket endpoint
        .route("/ws", get(websocket_handler))
        .with_state(hub)
        // Mount API routes
        .nest("/api", api_routes)
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add tracing layer
        .layer(TraceLayer::new_for_http());

    // Start the server
    let listener = tokio::net::TcpListener::bind(cfg.server_address())
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", cfg.server_address()));

    info!("🚀 Server running on http://{}", cfg.server_address());
    info!("📡 Collaboration WebSocket available at ws://{}/ws", cfg.server_address());
    info!("📚 Swagger UI available at http://{}/swagger", cfg.server_address());

    axum::serve(listener, app_routes)
        .await
        .expect("Server failed to start");
}
