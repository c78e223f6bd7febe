//! Prediction service: weather pre-fill and crop recommendation

use std::sync::Arc;

use serde::Serialize;
use shared::{RawObservation, StatusMessage, WeatherSnapshot};

use crate::external::WeatherClient;
use crate::ml::{self, ModelBundle, PredictError, RecommendationResult};

/// Prediction service
#[derive(Clone)]
pub struct PredictionService {
    models: Arc<ModelBundle>,
    weather: WeatherClient,
}

/// Location parameters accepted by the pre-fill lookup
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct PrefillQuery {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl PrefillQuery {
    /// Whether the caller asked for a lookup at all
    pub fn is_requested(&self) -> bool {
        [&self.city, &self.lat]
            .iter()
            .any(|v| v.as_deref().map(str::trim).is_some_and(|v| !v.is_empty()))
    }
}

/// Form state for the prediction page
#[derive(Debug, Serialize)]
pub struct PrefillResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
    pub form: RawObservation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<StatusMessage>,
    pub model_status: &'static str,
}

impl PredictionService {
    pub fn new(models: Arc<ModelBundle>, weather: WeatherClient) -> Self {
        Self { models, weather }
    }

    /// Look up the weather and turn it into form defaults
    pub async fn prefill(&self, query: &PrefillQuery) -> PrefillResponse {
        let weather = self
            .weather
            .fetch_weather(query.city.as_deref(), query.lat.as_deref(), query.lon.as_deref())
            .await;

        let message = match &weather {
            Some(snapshot) => Some(StatusMessage::success(format!(
                "Weather found: {}",
                snapshot.city_name
            ))),
            None if query.is_requested() => Some(StatusMessage::error("Could not fetch weather.")),
            None => None,
        };

        PrefillResponse {
            form: weather.as_ref().map(WeatherSnapshot::prefill).unwrap_or_default(),
            weather,
            message,
            model_status: self.models.status(),
        }
    }

    /// Run the recommendation pipeline off the async executor
    pub async fn recommend(&self, raw: RawObservation) -> Result<RecommendationResult, PredictError> {
        let models = Arc::clone(&self.models);

        run_blocking(move || {
            let mut rng = rand::thread_rng();
            ml::recommend(&models, &raw, &mut rng)
        })
        .await
    }
}

/// A panic inside the job surfaces as `PredictError::Unknown`
async fn run_blocking<F>(job: F) -> Result<RecommendationResult, PredictError>
where
    F: FnOnce() -> Result<RecommendationResult, PredictError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| PredictError::Unknown(e.to_string()))?
}
