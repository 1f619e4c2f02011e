//! Router assembly: common routes at the root, resources under `/api/v1`.

mod common;
mod internal;

pub use common::common_routes;
pub use internal::{external_routes, internal_routes};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub const API_PREFIX: &str = "/api/v1";

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("route {}", uri.path()))
}

/// Routing answers a known path with the wrong method by an empty 405; give it the error
/// envelope, keeping the `Allow` header.
async fn method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut enveloped = AppError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        enveloped.headers_mut().insert(header::ALLOW, allow);
    }
    enveloped
}

/// All routes with the not-found and wrong-method envelopes, without transport middleware.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest(&format!("{}/external", API_PREFIX), external_routes())
        .nest(&format!("{}/internal", API_PREFIX), internal_routes(state))
        .fallback(not_found)
        .layer(middleware::map_response(method_not_allowed))
}

/// The full application: routes plus body limit, request tracing and optional CORS.
/// `DefaultBodyLimit` only caps what `CrudRequest` reads; an oversized body surfaces after the
/// credential check.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = api_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(DefaultBodyLimit::max(config.body_limit_bytes)),
    );
    if let Some(origin) = &config.cors_allowed_origin {
        match HeaderValue::from_str(origin) {
            Ok(origin) => {
                router = router.layer(
                    CorsLayer::new()
                        .allow_origin(origin)
                        .allow_methods(Any)
                        .allow_headers(Any),
                );
            }
            Err(_) => tracing::warn!(origin = %origin, "ignoring invalid CORS origin"),
        }
    }
    router
}
