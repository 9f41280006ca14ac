//! HTTP surface of the consultation workflow.
//!
//! - `GET /`: liveness text.
//! - `POST /process`: multipart `audio`, `image`, `query_text`, `latitude`, `longitude`,
//!   `mode` (`hospitals` selects the hospital lookup). Responds with
//!   `{ speech_to_text, response_text, voice_url }`. Uploaded files are deleted once the
//!   request is answered.
//! - `GET /download/:filename`: a synthesized reply from the output directory.

mod config;
mod error;
mod routes;
mod uploads;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ServerError;
pub use routes::{AppState, ProcessResponse};
pub use uploads::sanitize_file_name;

/// Upload size cap for `/process`.
pub const BODY_LIMIT: usize = 25 * 1024 * 1024;

/// Router with every route and the shared layers.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/process", post(routes::process))
        .route("/download/:filename", get(routes::download))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http().make_span_with(
            |req: &axum::http::Request<axum::body::Body>| {
                tracing::info_span!("request", method = %req.method(), uri = %req.uri())
            },
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
