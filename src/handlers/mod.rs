pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod contacts;
pub mod extract;
pub mod health;
pub mod newsletters;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::models::{Cottage, Package, Taxi};
use crate::state::AppState;

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/health", get(health::health))
        .merge(catalog::routes::<Taxi>("/api/taxis"))
        .merge(catalog::routes::<Cottage>("/api/cottages"))
        .merge(catalog::routes::<Package>("/api/packages"))
        .route("/api/bookings", get(bookings::list).post(bookings::create))
        .route(
            "/api/bookings/:id",
            get(bookings::retrieve)
                .put(bookings::update)
                .patch(bookings::partial_update)
                .delete(bookings::destroy),
        )
        .route("/api/contacts", get(contacts::list).post(contacts::create))
        .route(
            "/api/contacts/:id",
            get(contacts::retrieve)
                .put(contacts::update)
                .patch(contacts::partial_update)
                .delete(contacts::destroy),
        )
        .route(
            "/api/newsletters",
            get(newsletters::list).post(newsletters::create),
        )
        .route(
            "/api/newsletters/:id",
            get(newsletters::retrieve)
                .put(newsletters::update)
                .patch(newsletters::partial_update)
                .delete(newsletters::destroy),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
