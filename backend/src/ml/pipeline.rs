//! Recommendation pipeline
//!
//! validate → encode → align → scale → classify → decode → enrich → simulate.
//! Each request runs against an immutable [`ModelBundle`]; there is no state
//! shared between requests besides the loaded artifacts.

use rand::Rng;
use serde::Serialize;
use shared::{CropDetails, MarketChartData, Observation, ObservationError, RawObservation};
use thiserror::Error;

use super::{simulate_market, InferenceError, ModelBundle};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("model artifacts are not loaded")]
    ModelUnavailable,

    #[error(transparent)]
    InvalidInput(#[from] ObservationError),

    #[error(transparent)]
    Model(#[from] InferenceError),

    #[error("unexpected prediction failure: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResult {
    pub crop: String,
    /// Echo of the validated input
    pub observation: Observation,
    pub details: CropDetails,
    pub market: MarketChartData,
}

/// Run one observation through the full pipeline
pub fn recommend<R: Rng + ?Sized>(
    bundle: &ModelBundle,
    raw: &RawObservation,
    rng: &mut R,
) -> Result<RecommendationResult, PredictError> {
    let artifacts = bundle.artifacts().ok_or(PredictError::ModelUnavailable)?;

    let observation = raw.validate()?;
    let crop = artifacts.predict(&observation)?;
    let details = shared::lookup(&crop);
    let market = simulate_market(details.price_range, rng);

    tracing::debug!("Recommended {} ({:?})", crop, details.family);

    Ok(RecommendationResult {
        crop,
        observation,
        details,
        market,
    })
}
