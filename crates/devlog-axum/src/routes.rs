//! Route definitions and router construction.
//!
//! Routes:
//! - `GET /health` liveness
//! - `GET /` service description
//! - `POST /`, `POST /logs` ingestion
//! - `GET /logs` retrieval
//!
//! Every response carries permissive CORS headers, any `OPTIONS` request is
//! answered 200 with an empty body, and anything else is a plain-text 404.

use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::{AppContext, AppState};

/// Create the router with all routes and middleware.
pub fn create_router(ctx: AppContext) -> Router {
    let state: AppState = Arc::new(ctx);

    Router::new()
        .route(
            "/",
            get(handlers::status::describe)
                .post(handlers::logs::ingest)
                .fallback(not_found),
        )
        .route(
            "/logs",
            get(handlers::logs::list)
                .post(handlers::logs::ingest)
                .fallback(not_found),
        )
        .route("/health", get(handlers::status::health).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(answer_preflight))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Short-circuit every `OPTIONS` request, on any path.
async fn answer_preflight(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(req).await
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
