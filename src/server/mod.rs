//! HTTP surface (axum).
//!
//! | route | body | response |
//! |---|---|---|
//! | `POST /api/analyze` | JSON `{ action, text }` | `{ model, data, result }` |
//! | `POST /api/caption` | multipart, field `image` | `{ success, caption, model }` |
//! | `POST /api/storyteller` | JSON `{ prompt, maxLength?, temperature? }` | `{ model, story }` |
//! | `GET /api` | | `{ message }` |
//! | `POST /api` | any JSON | `{ receivedData }` |
//!
//! Failures are JSON `{ error }` bodies; the caption route adds
//! `success: false` and, after exhaustion, `attempted_models`.

mod error;
mod handlers;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use crate::config::{RelayConfig, ServerConfig};
use crate::error::Result;
use crate::service::RelayService;

pub use error::ApiError;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: RelayService,
}

/// Routes over an existing service.
pub fn router(service: RelayService, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api", get(handlers::hello).post(handlers::echo))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/caption", post(handlers::caption))
        .route("/api/storyteller", post(handlers::storyteller))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(AppState { service })
}

/// Build the service from `config` and wrap it in the routes. Handlers only
/// run the delayed retry loop when `server.retry_in_handlers` is set.
pub fn app(config: &RelayConfig) -> Result<Router> {
    let retry = config
        .server
        .retry_in_handlers
        .then(|| config.retry.clone());
    let service = RelayService::new(config)?.with_retry_policy(retry);
    Ok(router(service, &config.server))
}
