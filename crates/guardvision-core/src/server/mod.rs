//! HTTP API: `/api/ocr`, `/api/analyze` and `/api/test`.
//!
//! Every failure after routing becomes `500 {"error": message}`; a wrong
//! method becomes `405 {"error": "Method not allowed"}` before any vendor
//! adapter is built.

mod handlers;
mod probe;

pub use probe::probe_services;

use crate::config::Config;
use crate::factory::{ConfiguredVendors, VendorFactory};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub vendors: Arc<dyn VendorFactory>,
    pub config: Arc<Config>,
    /// Outbound client used by the service probe
    pub client: reqwest::Client,
}

impl AppState {
    pub fn from_config(config: Arc<Config>) -> Result<Self, reqwest::Error> {
        let vendors = ConfiguredVendors::new(config.clone())?;
        let client = vendors.client().clone();
        Ok(Self {
            vendors: Arc::new(vendors),
            config,
            client,
        })
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/ocr",
            post(handlers::ocr).fallback(method_not_allowed),
        )
        .route(
            "/api/analyze",
            post(handlers::analyze).fallback(method_not_allowed),
        )
        .route(
            "/api/test",
            get(probe::test_services).fallback(method_not_allowed),
        )
        .with_state(state)
}

/// Bind `config.server.bind` and serve until the process exits.
pub async fn serve(config: Config) -> crate::Result<()> {
    let bind = config.server.bind.clone();
    let state = AppState::from_config(Arc::new(config))?;

    let listener = TcpListener::bind(&bind).await?;
    tracing::info!("GuardVision API listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

/// A failure reported to the caller as `500 {"error": message}`.
#[derive(Debug)]
pub struct ApiError(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0 })),
        )
            .into_response()
    }
}

impl From<crate::error::VendorError> for ApiError {
    fn from(err: crate::error::VendorError) -> Self {
        ApiError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError(format!("Invalid request body: {err}"))
    }
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}
