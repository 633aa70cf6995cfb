//! Axum request handlers for all service endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;
use uuid::Uuid;

use common::protocol::{ErrorResponse, HealthResponse};
use common::ServiceError;

use super::state::AppState;

/// `POST /credentials/{id}` — seal the credential and return its capsule.
///
/// The response body is the plain-text hex capsule
/// (`nonce || ciphertext || tag`); the caller supplies the id it fetched
/// under as associated data when opening.
pub async fn fetch_capsule(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = Uuid::parse_str(&id) else {
        return error_response(ServiceError::BadRequest(
            "credential id must be a UUID".into(),
        ));
    };

    let Some(credential) = state.store.get(&id).await else {
        return error_response(ServiceError::NotFound(format!(
            "no credential with id {}",
            id.hyphenated()
        )));
    };

    match credential.seal() {
        Ok(capsule) => (StatusCode::OK, capsule.to_hex()).into_response(),
        Err(e) => {
            warn!(error = %e, id = %id.hyphenated(), "failed to seal credential");
            error_response(ServiceError::SealFailure("could not seal credential".into()))
        }
    }
}

/// `GET /health` — liveness check with the current store size.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        credentials: state.store.len().await,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Render a [`ServiceError`] as its JSON error body and status code.
fn error_response(err: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse::new(err.code(), err.to_string());
    (status, Json(body)).into_response()
}
