// src/bin/api_server.rs

use anyhow::Context;
use axum::http::Method;
use snippet_catalog::infra::logging::init_logging;
use snippet_catalog::transport;
use snippet_catalog::{AppConfig, SnippetRepository};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}, continuing without structured logging", e);
    }

    let config = AppConfig::from_env();
    info!("Starting snippet-catalog API v{}", env!("CARGO_PKG_VERSION"));

    // --- Repository Initialization ---
    // The store pool is opened lazily on the first request; nothing is dialled here.
    let repository = SnippetRepository::from_config(&config);
    if config.database_url.is_some() {
        info!("Snippet store configured; fixture fallback enabled={}", config.fixture_fallback);
    } else if config.fixture_fallback {
        warn!("DATABASE_URL not set; every request will be served from fixture data");
    } else {
        warn!("DATABASE_URL not set and FIXTURE_FALLBACK=false; snippet reads will fail");
    }

    let app_state = transport::http::AppState::new(repository);

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS]);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("bind {}", config.bind_address))?;
    info!("API server listening on http://{}", config.bind_address);
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP")?;

    info!("Server shutdown gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
