//! HTTP API handlers
//!
//! Structural failures (missing prompt, empty batch, no resolvable key)
//! are fatal to the whole request and reported as one JSON error before
//! any upstream call. Per-item upstream failures are recovered inside the
//! batch runner and never abort a bulk request.

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, Sse},
    response::Json,
};
use chrono::Utc;
use futures_util::{Stream, StreamExt};
use serde_json::{json, Value};

use crate::core::batch::{generate_item, BatchRunner};
use crate::core::prompt::DEFAULT_SYSTEM_INSTRUCTIONS;
use crate::gateway_impl::Gateway;
use crate::traits::TextGenerator;
use crate::types::{BulkGenerationPayload, SingleGenerationPayload};
use shared::BatchOutcome;

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

/// Request-body key takes precedence; otherwise fall back to the
/// server-configured key; otherwise fail before any upstream call.
fn resolve_api_key<G: TextGenerator + 'static>(
    gateway: &Gateway<G>,
    body_key: Option<String>,
) -> Result<String, ApiError> {
    body_key
        .filter(|key| !key.trim().is_empty())
        .or_else(|| gateway.state().server_api_key.clone())
        .ok_or_else(|| bad_request("Claude API key is required"))
}

fn system_instructions(body: Option<String>) -> String {
    body.filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTIONS.to_string())
}

/// Liveness check
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

/// `POST /api/claude`: one prompt, one completion.
///
/// Upstream failures are fatal here (HTTP 500), unlike in bulk modes.
pub async fn generate<G>(
    State(gateway): State<Gateway<G>>,
    Json(payload): Json<SingleGenerationPayload>,
) -> Result<Json<Value>, ApiError>
where
    G: TextGenerator + 'static,
{
    let (request, instructions, body_key) = payload.into_request();
    let request = request.ok_or_else(|| bad_request("prompt is required"))?;
    let api_key = resolve_api_key(&gateway, body_key)?;
    let system = system_instructions(instructions);

    match generate_item(gateway.generator(), &api_key, &system, &request).await {
        Ok(completion) => Ok(Json(json!({
            "code": completion.text,
            "usage": completion.usage,
            "model": completion.model,
        }))),
        Err(failure) => {
            tracing::error!(error = %failure, "single generation failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": failure.to_string() })),
            ))
        }
    }
}

/// `POST /api/claude/bulk`: attempt every request sequentially and
/// answer once with the aggregate outcome.
pub async fn generate_bulk<G>(
    State(gateway): State<Gateway<G>>,
    Json(payload): Json<BulkGenerationPayload>,
) -> Result<Json<BatchOutcome>, ApiError>
where
    G: TextGenerator + 'static,
{
    if payload.requests.is_empty() {
        return Err(bad_request("requests array is required"));
    }
    let api_key = resolve_api_key(&gateway, payload.api_key)?;
    let system = system_instructions(payload.system_instructions);

    tracing::info!(total = payload.requests.len(), "starting bulk batch");
    let runner = BatchRunner::new(gateway.generator_arc(), gateway.state().bulk_pacing);
    let outcome = runner.run(&api_key, &system, &payload.requests).await;
    Ok(Json(outcome))
}

/// `POST /api/claude/bulk-stream`: same iteration as bulk, reported as a
/// long-lived `text/event-stream` of progress frames. The connection is
/// held open for the duration of the batch and closes after `complete`.
pub async fn generate_bulk_stream<G>(
    State(gateway): State<Gateway<G>>,
    Json(payload): Json<BulkGenerationPayload>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError>
where
    G: TextGenerator + 'static,
{
    if payload.requests.is_empty() {
        return Err(bad_request("requests array is required"));
    }
    let api_key = resolve_api_key(&gateway, payload.api_key)?;
    let system = system_instructions(payload.system_instructions);
    let requests = payload.requests;

    tracing::info!(total = requests.len(), "starting streamed batch");
    let runner = BatchRunner::new(gateway.generator_arc(), gateway.state().stream_pacing);
    let (tx, rx) = futures_channel::mpsc::unbounded();

    tokio::spawn(async move {
        // A failed send means the client went away; the runner stops on
        // its own and the rest of the batch is orphaned.
        runner
            .run_with_events(&api_key, &system, &requests, move |event| {
                tx.unbounded_send(event).is_ok()
            })
            .await;
    });

    Ok(Sse::new(rx.map(|event| Event::default().json_data(&event))))
}
