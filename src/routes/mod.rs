//! Router assembly.

mod common;
mod items;

pub use common::common_routes;
pub use items::item_routes;

use crate::config::Settings;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// All routes without middleware. Used directly by tests.
pub fn app_routes(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(item_routes(state))
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match HeaderValue::from_str(origin) {
        Ok(v) => AllowOrigin::exact(v),
        Err(_) => {
            tracing::warn!(origin, "invalid CORS origin, allowing none");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_LENGTH])
}

/// Routes wrapped with tracing, CORS and the request body limit.
pub fn app(state: AppState, settings: &Settings) -> Router {
    app_routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&settings.cors_origin))
            .layer(DefaultBodyLimit::max(settings.body_limit)),
    )
}
