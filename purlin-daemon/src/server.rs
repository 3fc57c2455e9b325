//! HTTP surface for the enrichment daemon.
//!
//! Two routes: `GET /health` (liveness probe) and `POST /enrich`
//! (the enrichment endpoint). Every response — including every error —
//! is `application/json`; error bodies are `{"error": "..."}`.
//!
//! Request bodies are capped at 10 MiB, and each enrichment runs under a
//! 10-minute deadline. A deadline overrun is not an error: lookups past
//! the deadline are abandoned and the partially-enriched document is
//! returned.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use purlin_core::error::DocumentError;
use purlin_enricher::{EnrichOptions, Enricher};

/// Maximum request body size (10 MiB).
const MAX_REQUEST_SIZE: usize = 10 * 1024 * 1024;

/// Maximum time allowed for a single enrichment request.
const ENRICHMENT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Shared state behind every request handler.
pub struct AppState {
    pub engine: Enricher,
    pub default_parallelism: usize,
}

/// Request body for `POST /enrich`.
#[derive(Debug, Deserialize)]
struct EnrichRequest {
    /// The SBOM document to enrich. Kept as raw JSON so the engine sees
    /// the original bytes.
    sbom: Option<Box<RawValue>>,
    /// Number of concurrent workers. Absent or 0 means the daemon default.
    #[serde(default)]
    parallelism: Option<usize>,
}

/// Response body for `POST /enrich`.
#[derive(Debug, Serialize)]
struct EnrichResponse {
    sbom: Box<RawValue>,
}

/// Error response body, shared by every error path.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Build the daemon router.
///
/// Method mismatches get an explicit JSON 405 instead of axum's bare
/// default, so the all-responses-are-JSON contract holds there too.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/health",
            get(handle_health).fallback(handle_health_wrong_method),
        )
        .route(
            "/enrich",
            post(handle_enrich).fallback(handle_enrich_wrong_method),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_SIZE))
        .with_state(state)
}

/// `GET /health` — liveness probe.
async fn handle_health() -> Json<&'static str> {
    Json("OK")
}

/// Any other method on `/health`.
async fn handle_health_wrong_method() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "only GET method is allowed".to_owned(),
    )
}

/// Any other method on `/enrich`.
async fn handle_enrich_wrong_method() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "only POST method is allowed".to_owned(),
    )
}

/// `POST /enrich` — enrich one SBOM document.
async fn handle_enrich(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        // Oversized or unreadable bodies surface here (413 for the cap)
        Err(rejection) => {
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    let request: EnrichRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %e, "failed to decode enrich request");
            return error_response(StatusCode::BAD_REQUEST, format!("invalid JSON: {e}"));
        }
    };

    let Some(sbom) = request.sbom else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "sbom field is required".to_owned(),
        );
    };

    let parallelism = request
        .parallelism
        .filter(|&parallelism| parallelism > 0)
        .unwrap_or(state.default_parallelism);

    let result = state
        .engine
        .enrich(EnrichOptions {
            sbom: sbom.get().as_bytes().to_vec(),
            parallelism,
            deadline: Some(Instant::now() + ENRICHMENT_TIMEOUT),
        })
        .await;

    let enriched = match result {
        Ok(enriched) => enriched,
        Err(e @ (DocumentError::Invalid(_) | DocumentError::UnknownFormat)) => {
            tracing::error!(error = %e, "rejected enrich request");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
        Err(e @ DocumentError::Serialize(_)) => {
            tracing::error!(error = %e, "failed to enrich SBOM");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("enrichment failed: {e}"),
            );
        }
    };

    let sbom = match String::from_utf8(enriched).map(RawValue::from_string) {
        Ok(Ok(sbom)) => sbom,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "enriched document is not valid JSON");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "enrichment produced an invalid document".to_owned(),
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "enriched document is not valid UTF-8");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "enrichment produced an invalid document".to_owned(),
            );
        }
    };

    Json(EnrichResponse { sbom }).into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}
