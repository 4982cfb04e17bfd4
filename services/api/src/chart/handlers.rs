use axum::extract::State;
use axum::Json;
use chrono::Utc;

use chartbot_engine::ChartResponse;

use crate::AppState;

use super::requests::ChartRequest;
use super::responses::{suggestions, SuggestionsResponse};

/// Resolve a question and answer with a chart payload. Always 200: a
/// question that cannot be resolved answers with `success: false` so the
/// UI renders the error inline instead of handling transport failures.
pub async fn post_chart(
    State(state): State<AppState>,
    Json(body): Json<ChartRequest>,
) -> Json<ChartResponse> {
    match state.engine.generate(&body.message, Utc::now()).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::warn!(error = %e, "question could not be resolved");
            Json(ChartResponse::failure(e.to_string()))
        }
    }
}

pub async fn get_suggestions() -> Json<SuggestionsResponse> {
    Json(suggestions())
}
