use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::responder::Responder;

pub mod error;
pub mod handlers;
pub mod models;

pub fn create_router(responder: Arc<Responder>) -> Router {
    // Allow every origin, method and header with credentials. A literal `*`
    // is not permitted alongside credentials, so the request's values are
    // echoed back instead.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/search", post(handlers::search_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(responder)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
