//! HTTP surface: public status page, login, and the operator dashboard.
//!
//! This module is organized into submodules:
//! - `public` - the anonymous status page (`/`)
//! - `login` - credential form and session teardown (`/dashboard/login`, `/dashboard/logout`)
//! - `dashboard` - authenticated incident and service management (`/dashboard/*`)
//! - `views` - display models shared by the templates

pub mod dashboard;
pub mod login;
pub mod public;
pub mod views;

use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::AppResources;

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}

/// Build the application router with all routes and middleware attached.
pub fn router(resources: AppResources) -> Router {
    Router::new()
        .route("/", get(public::index))
        .route("/healthz", get(health))
        .route(
            "/dashboard/login",
            get(login::login_page).post(login::login_submit),
        )
        .route("/dashboard/logout", post(login::logout))
        .route("/dashboard", get(dashboard::index))
        .route(
            "/dashboard/incident/new",
            get(dashboard::incident_new_page).post(dashboard::incident_create),
        )
        .route(
            "/dashboard/incident/{id}",
            get(dashboard::incident_detail).post(dashboard::incident_update),
        )
        .route(
            "/dashboard/service/{id}/status",
            post(dashboard::service_status),
        )
        .route(
            "/dashboard/settings",
            get(dashboard::settings_page).post(dashboard::settings_update),
        )
        .layer(Extension(resources))
        .layer(TraceLayer::new_for_http())
}

/// Starts the web server with all configured routes.
#[tracing::instrument(skip(resources))]
pub async fn start_webserver(resources: AppResources) -> color_eyre::Result<()> {
    let bind_addr = resources.config.bind_addr.clone();
    let app = router(resources);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "server running");
    axum::serve(listener, app)
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
