//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::rag::RagService;
use crate::services::ServiceRegistry;
use crate::Result;

/// Assemble the application router with its middleware
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server and run until Ctrl-C
pub async fn serve_api(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("Starting digital twin API server...");

    // Service handles are built lazily on first request
    let services = Arc::new(ServiceRegistry::new(config.clone()));
    if let Err(e) = services.validate().await {
        tracing::warn!("{} (requests will fail until this is fixed)", e);
    }
    let rag = Arc::new(RagService::new(config, services));
    let state = AppState::new(rag, config.server.session_timeout_secs);

    let app = build_router(state, enable_cors);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  POST /api/mcp     - MCP JSON-RPC (JSON or SSE)");
    info!("  GET  /api/mcp     - MCP endpoint info");
    info!("  GET  /api/health  - Service health");
    info!("  POST /api/query   - RAG query");
    info!("  POST /api/chat    - Multi-turn chat");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
