//! Style Guide Questionnaire
//!
//! A REST backend with SQLite persistence where designers register clients and
//! clients answer a one-time visual-preference form, plus the client-side form
//! wizard and the gateway it submits through.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod wizard;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // Designer routes
    let designer_routes = Router::new()
        .route("/revision", get(api::get_revision))
        .route("/clients", get(api::list_clients).post(api::create_client))
        .route("/clients/stats", get(api::get_client_stats))
        .route(
            "/clients/{id}",
            get(api::get_client).delete(api::delete_client),
        )
        .route("/clients/{id}/status", put(api::update_client_status))
        .route("/clients/{id}/report", get(api::get_client_report))
        .layer(middleware::from_fn(move |req, next| {
            auth::designer_auth_layer(psk.clone(), req, next)
        }));

    // Public routes: catalog and the form link
    let public_routes = Router::new()
        .route("/catalog", get(api::get_catalog))
        .route("/catalog/logo-categories", get(api::list_logo_categories))
        .route("/catalog/palettes", get(api::list_palettes))
        .route("/catalog/typography", get(api::list_typography_styles))
        .route("/form/{client_id}", get(api::get_form_client))
        .route(
            "/form/{client_id}/response",
            post(api::submit_form_response).get(api::get_form_response),
        );

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", designer_routes.merge(public_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
