use super::shutdown::{ShutdownCoordinator, coordinated_shutdown, shutdown_signal};
use crate::errors::handlers::not_found;
use crate::http::{create_cors_layer, parse_origins, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

/// Prefix every domain router is mounted under.
pub const API_PREFIX: &str = "/api/v1";

/// Serve `router` until SIGINT or SIGTERM.
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })
}

/// Mount `apis` under `/api/v1` and add the cross-cutting layers.
///
/// Layers: request tracing, security headers, CORS and response compression.
/// Unmatched paths get a JSON 404.
///
/// `CORS_ALLOWED_ORIGIN` must hold a comma-separated list of origins, e.g.
/// `http://localhost:3000,https://shop.example.com`.
///
/// Health routes are merged by the app, outside the prefix.
pub fn create_router(apis: Router) -> io::Result<Router> {
    let origins = std::env::var("CORS_ALLOWED_ORIGIN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN environment variable is required. Example: CORS_ALLOWED_ORIGIN=http://localhost:3000",
        )
    })?;
    let allowed_origins = parse_origins(&origins)?;
    info!("CORS configured with allowed origins: {}", origins);

    Ok(with_layers(
        Router::new().nest(API_PREFIX, apis),
        create_cors_layer(allowed_origins),
    ))
}

fn with_layers(router: Router, cors: tower_http::cors::CorsLayer) -> Router {
    router
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(CompressionLayer::new())
}

/// Serve with coordinated shutdown: once a signal arrives the server stops
/// accepting connections and `cleanup` runs, bounded by `shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        if shutdown_rx.recv().await.is_err() {
            return;
        }

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinated_shutdown(coordinator.clone()))
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    // Unblocks the cleanup task if the server stopped for another reason.
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
