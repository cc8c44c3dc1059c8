//! API route definitions and router builder.

pub mod availability;
pub mod bookings;
pub mod chat;
pub mod health;
pub mod knowledge;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Upload limit for `POST /api/upload-pdf/`.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    let api = Router::new()
        // Bookings
        .route(
            "/bookings/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/bookings/group/", post(bookings::create_group_booking))
        .route("/availability/", post(availability::check_availability))
        // Chat assistant
        .route("/chat/", post(chat::chat))
        // Knowledge base management
        .route("/initialize-knowledge-base/", post(knowledge::initialize))
        .route(
            "/upload-pdf/",
            post(knowledge::upload_pdf).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        );

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
