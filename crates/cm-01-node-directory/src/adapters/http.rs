//! # HTTP Adapter
//!
//! JSON-over-HTTP boundary for the directory.
//!
//! | Route            | Body                      | Reply                     |
//! |------------------|---------------------------|---------------------------|
//! | `POST /announce` | `{"endpoints": [..]}`     | `{}`                      |
//! | `POST /resolve`  | `{"address": "0x.."}`     | `{"endpoints": [..]}`     |
//! | `GET /health`    | -                         | `DirectoryStats` snapshot |
//!
//! Caller identity for `/announce` is never read from the body. The layer in
//! front of this router that terminates TLS inserts a [`PeerContext`] request
//! extension for every connection it authenticated; without one the request
//! is rejected with `UNAUTHENTICATED`. A body that does not decode is
//! `INVALID_ARGUMENT` with the same error body as every other failure.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode as HttpStatus,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::{DirectoryError, DirectoryStats, StatusCode};
use crate::identity::PeerContext;
use crate::ports::DirectoryApi;
use crate::service::DirectoryService;

/// Body of `POST /announce`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnounceRequest {
    /// Endpoints the caller can be reached at, opaque to the directory.
    #[serde(default)]
    pub endpoints: Vec<String>,
}

/// Reply to a successful announce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnounceReply {}

/// Body of `POST /resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    /// Textual account address, `0x` prefix optional.
    pub address: String,
}

/// Reply to a successful resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveReply {
    /// Endpoints from the most recent announce.
    pub endpoints: Vec<String>,
}

/// Error body returned for every failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable status name, e.g. `NOT_FOUND`.
    pub code: String,
    /// Human-readable detail.
    pub message: String,
}

fn http_status(status: StatusCode) -> HttpStatus {
    match status {
        StatusCode::InvalidArgument => HttpStatus::BAD_REQUEST,
        StatusCode::NotFound => HttpStatus::NOT_FOUND,
        StatusCode::Unauthenticated => HttpStatus::UNAUTHORIZED,
        StatusCode::Internal => HttpStatus::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            code: status.as_str().to_string(),
            message: self.to_string(),
        };
        (http_status(status), Json(body)).into_response()
    }
}

impl From<JsonRejection> for DirectoryError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

/// Build the directory router.
pub fn router(service: Arc<DirectoryService>) -> Router {
    Router::new()
        .route("/announce", post(handle_announce))
        .route("/resolve", post(handle_resolve))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn handle_announce(
    State(service): State<Arc<DirectoryService>>,
    peer: Option<Extension<PeerContext>>,
    body: Result<Json<AnnounceRequest>, JsonRejection>,
) -> Result<Json<AnnounceReply>, DirectoryError> {
    let peer = peer.map(|Extension(peer)| peer);
    let Json(request) = body?;

    service
        .announce(peer.as_ref(), request.endpoints)
        .inspect_err(|err| warn!(error = %err, "Announce rejected"))?;

    Ok(Json(AnnounceReply {}))
}

async fn handle_resolve(
    State(service): State<Arc<DirectoryService>>,
    body: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<ResolveReply>, DirectoryError> {
    let Json(request) = body?;
    let endpoints = service.resolve(&request.address)?;
    Ok(Json(ResolveReply { endpoints }))
}

async fn handle_health(State(service): State<Arc<DirectoryService>>) -> Json<DirectoryStats> {
    Json(service.stats())
}
