//! Crop prediction handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use shared::{RawObservation, StatusMessage};

use super::FormOrJson;
use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::ml::RecommendationResult;
use crate::services::prediction::{PrefillQuery, PrefillResponse};
use crate::services::PredictionService;
use crate::AppState;

#[derive(Serialize)]
pub struct PredictResponse {
    pub result: RecommendationResult,
    pub message: StatusMessage,
}

fn prediction_service(state: &AppState) -> PredictionService {
    PredictionService::new(state.models.clone(), state.weather.clone())
}

/// Prediction form endpoint handler, optionally pre-filled from the weather
pub async fn prefill(
    State(state): State<AppState>,
    Query(query): Query<PrefillQuery>,
) -> Json<PrefillResponse> {
    Json(prediction_service(&state).prefill(&query).await)
}

/// Recommendation endpoint handler
pub async fn predict(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    FormOrJson(raw): FormOrJson<RawObservation>,
) -> Result<Json<PredictResponse>, AppError> {
    let result = prediction_service(&state).recommend(raw).await?;

    tracing::info!("Recommended {} for {}", result.crop, user.username);

    Ok(Json(PredictResponse {
        result,
        message: StatusMessage::success("Prediction Successful!"),
    }))
}
