mod auth;
mod backend;
mod config;
mod engine;
mod middleware;

mod error;
mod models;
mod routes;

use std::sync::Arc;

use crate::{backend::HttpBackend, config::Config, models::AppState};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use axum::http::{HeaderName, header};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    let backend = HttpBackend::new(&cfg.base_url, cfg.upstream_timeout_secs)?;

    let state = AppState {
        backend: Arc::new(backend),
        page_size: cfg.page_size,
    };

    // Browser clients call the portal directly; preflight must pass X-User-ID.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(middleware::auth_context::USER_ID_HEADER),
        ]);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!(backend = %cfg.base_url, "Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
