use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use super::directory;
use super::health;
use super::state::AppState;

/// Create the full router with application state. When `frontend_url` is
/// set, cross-origin requests from that origin are allowed.
pub fn create_router_with_state(state: AppState, frontend_url: Option<&str>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .merge(directory::create_directory_router())
        .with_state(state);

    if let Some(cors) = frontend_url.and_then(build_cors_layer) {
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http())
}

fn build_cors_layer(frontend_url: &str) -> Option<CorsLayer> {
    let origin = match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => origin,
        Err(e) => {
            warn!(frontend_url, error = %e, "Ignoring invalid frontend URL for CORS");
            return None;
        }
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::HEAD,
                Method::PUT,
                Method::PATCH,
                Method::POST,
                Method::DELETE,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                HeaderName::from_static("x-lang"),
            ]),
    )
}
