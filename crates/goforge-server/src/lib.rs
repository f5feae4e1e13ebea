pub mod embed;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// How the server is exposed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServeOptions {
    /// Serve the embedded front end for non-API paths.
    pub ui: bool,
    pub open_browser: bool,
}

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let ui = app_state.ui;
    let router = Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/config", get(routes::config::get_config))
        // Analysis
        .route("/api/analyze/structure", post(routes::analyze::structure))
        .route("/api/analyze/quality", post(routes::analyze::quality))
        // Dependencies
        .route("/api/dependency/check", post(routes::dependency::check))
        .route("/api/dependency/update", post(routes::dependency::update))
        .route("/api/dependency/security", post(routes::dependency::security))
        // Tests
        .route("/api/test/generate", post(routes::test::generate))
        .route("/api/test/coverage", post(routes::test::coverage))
        // Profiling
        .route("/api/profile/cpu", post(routes::profile::cpu))
        .route("/api/profile/memory", post(routes::profile::memory))
        .route("/api/profile/visualize", post(routes::profile::visualize))
        // Containers
        .route("/api/container/dockerfile", post(routes::container::dockerfile))
        .route("/api/container/kubernetes", post(routes::container::kubernetes))
        // Docs
        .route("/api/docs/generate", post(routes::docs::generate));

    let router = if ui {
        router.fallback(embed::static_handler)
    } else {
        router.fallback(embed::api_only_fallback)
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Serve on a pre-bound listener until the connection loop ends.
///
/// Accepting a bound `TcpListener` lets the caller learn the actual port
/// first (useful when `port = 0` and the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    opts: ServeOptions,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app_state = AppState::new(&root, opts.ui)?;
    let app = build_router(app_state);

    tracing::info!(root = %root.display(), "goforge server listening on http://localhost:{actual_port}");

    if opts.open_browser {
        let url = format!("http://localhost:{actual_port}");
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "could not open browser");
        }
    }

    axum::serve(listener, app).await?;
    Ok(())
}
