//! Route definitions for the Crop Advisor platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Static pages (public)
        .nest("/pages", page_routes())
        // Contact form (public)
        .route(
            "/contact",
            get(handlers::contact_page).post(handlers::send_contact),
        )
        // Auth routes (public)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes - crop prediction
        .nest("/predict", predict_routes(state))
}

/// Static page routes (public)
fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(handlers::home))
        .route("/about", get(handlers::about))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
}

/// Crop prediction routes (protected)
fn predict_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::prefill).post(handlers::predict))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
