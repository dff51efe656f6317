use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::api::error::{err, ApiError};
use crate::api::types::AppState;
use crate::report::{Record, ScoreUpdate, UpdateResponse, UPDATE_MESSAGE};
use crate::store::UpdateError;

pub async fn get_report(State(state): State<AppState>) -> Json<Record> {
    Json(state.store.snapshot().await)
}

pub async fn update_scores(
    State(state): State<AppState>,
    body: Result<Json<ScoreUpdate>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    // Rejected bodies never reach the store.
    let Json(update) = body?;

    match state.store.update(&update).await {
        Ok(record) => Ok(Json(UpdateResponse {
            message: UPDATE_MESSAGE.to_string(),
            data: record,
        })),
        Err(UpdateError::Persist { record, source }) => {
            error!(
                path = %state.store.path().to_string_lossy(),
                overall = %record.overall_score,
                "failed to persist report: {source:#}"
            );
            Err(err(
                StatusCode::INTERNAL_SERVER_ERROR,
                "persist_failed",
                format!("{source:#}"),
                Some(json!({ "fields": update.fields() })),
            ))
        }
    }
}
