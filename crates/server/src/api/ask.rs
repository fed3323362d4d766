//! The question-answering endpoint.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{error, info};

use crate::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    pub context: String,
}

/// `POST /ask` — retrieve context for the question, then synthesize an
/// answer.
///
/// The body is parsed by hand so that an absent, non-JSON, or
/// question-less body all get the same 400 contract. Retrieval failures are
/// isolated to this request as a generic 500; generation failures never
/// reach here (the generator substitutes its fallback text).
pub async fn ask(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AskResponse>, (StatusCode, Json<ErrorResponse>)> {
    let question = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|data| data.get("question")?.as_str().map(str::to_string))
        .ok_or((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Question not provided",
            }),
        ))?;

    info!("Received question: {}", question);

    let context = state.retriever.retrieve(&question).await.map_err(|e| {
        error!("Retrieval failed: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Internal server error",
            }),
        )
    })?;

    let answer = state.generator.generate(&question, &context).await;

    Ok(Json(AskResponse {
        question,
        answer,
        context,
    }))
}
