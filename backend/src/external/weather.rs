//! Weather API client for pre-filling the prediction form
//!
//! Integrates with the OpenWeatherMap current-weather endpoint. Callers only
//! ever see `Option<WeatherSnapshot>`: any failure is logged and treated as
//! "no data".

use chrono::Utc;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{extrapolate_daily_rainfall, WeatherSnapshot};
use thiserror::Error;

use crate::config::WeatherConfig;

const UNKNOWN_CITY: &str = "Unknown";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    units: String,
}

/// Where to look up the weather
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Coordinates { lat: String, lon: String },
    City(String),
}

impl WeatherQuery {
    /// Coordinates win when both are given, then a non-blank city
    pub fn from_params(city: Option<&str>, lat: Option<&str>, lon: Option<&str>) -> Option<Self> {
        fn present(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }

        match (present(lat), present(lon)) {
            (Some(lat), Some(lon)) => Some(WeatherQuery::Coordinates {
                lat: lat.to_string(),
                lon: lon.to_string(),
            }),
            _ => present(city).map(|c| WeatherQuery::City(c.to_string())),
        }
    }

    fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            WeatherQuery::Coordinates { lat, lon } => vec![("lat", lat.as_str()), ("lon", lon.as_str())],
            WeatherQuery::City(city) => vec![("q", city.as_str())],
        }
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather API error: {status} - {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse weather response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("weather API reported code {0}")]
    Remote(String),
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    // Numeric on success, sometimes a string on errors
    #[serde(default)]
    cod: Option<serde_json::Value>,
    #[serde(default)]
    name: Option<String>,
    main: Option<OWMMain>,
    wind: Option<OWMWind>,
    rain: Option<OWMRain>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OWMRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient from configuration
    pub fn new(config: &WeatherConfig) -> Self {
        Self::with_base_url(config.api_key.clone(), config.api_endpoint.clone())
            .with_units(config.units.clone())
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            units: "metric".to_string(),
        }
    }

    pub fn with_units(mut self, units: String) -> Self {
        self.units = units;
        self
    }

    /// Look up current conditions, swallowing every failure
    pub async fn fetch_weather(
        &self,
        city: Option<&str>,
        lat: Option<&str>,
        lon: Option<&str>,
    ) -> Option<WeatherSnapshot> {
        let query = WeatherQuery::from_params(city, lat, lon)?;

        match self.fetch_current(&query).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Weather lookup for {:?} failed: {}", query, e);
                None
            }
        }
    }

    /// Fetch current weather conditions
    pub async fn fetch_current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let mut params = query.params();
        params.push(("appid", self.api_key.as_str()));
        params.push(("units", self.units.as_str()));

        let response = self.client.get(&url).query(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status { status, body });
        }

        let body = response.bytes().await?;
        let data: OWMCurrentResponse = serde_json::from_slice(&body)?;

        convert_current_response(data)
    }
}

fn cod_is_ok(cod: &serde_json::Value) -> bool {
    match cod {
        serde_json::Value::Number(n) => n.as_u64() == Some(200),
        serde_json::Value::String(s) => s.trim() == "200",
        _ => false,
    }
}

/// Convert an OpenWeatherMap current response to a snapshot
fn convert_current_response(data: OWMCurrentResponse) -> Result<WeatherSnapshot, WeatherError> {
    match &data.cod {
        Some(cod) if cod_is_ok(cod) => {}
        Some(cod) => return Err(WeatherError::Remote(cod.to_string())),
        None => return Err(WeatherError::Remote("missing".to_string())),
    }

    let (main, wind) = match (data.main, data.wind) {
        (Some(main), Some(wind)) => (main, wind),
        _ => {
            return Err(WeatherError::Remote(
                "response has no main or wind block".to_string(),
            ))
        }
    };

    let rain = data.rain.as_ref();
    let rainfall = extrapolate_daily_rainfall(
        rain.and_then(|r| r.one_hour),
        rain.and_then(|r| r.three_hour),
    );

    Ok(WeatherSnapshot {
        city_name: data
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_CITY.to_string()),
        temperature: Decimal::from_f64(main.temp).unwrap_or_default(),
        humidity: main.humidity.round() as i32,
        windspeed: Decimal::from_f64(wind.speed).unwrap_or_default(),
        rainfall,
        fetched_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn parse(body: &str) -> Result<WeatherSnapshot, WeatherError> {
        convert_current_response(serde_json::from_str(body).unwrap())
    }

    #[test]
    fn test_query_prefers_coordinates() {
        assert_eq!(
            WeatherQuery::from_params(Some("Pune"), Some("18.5"), Some("73.8")),
            Some(WeatherQuery::Coordinates {
                lat: "18.5".into(),
                lon: "73.8".into()
            })
        );
        assert_eq!(
            WeatherQuery::from_params(Some("Pune"), Some("18.5"), None),
            Some(WeatherQuery::City("Pune".into()))
        );
        assert_eq!(WeatherQuery::from_params(Some("  "), None, None), None);
        assert_eq!(WeatherQuery::from_params(None, None, None), None);
    }

    #[test]
    fn test_convert_success() {
        let snapshot = parse(
            r#"{"cod":200,"name":"Pune","main":{"temp":27.4,"humidity":61},
                "wind":{"speed":3.6},"rain":{"1h":0.5}}"#,
        )
        .unwrap();
        assert_eq!(snapshot.city_name, "Pune");
        assert_eq!(snapshot.humidity, 61);
        assert_eq!(snapshot.rainfall, Decimal::from_str("12").unwrap());
    }

    #[test]
    fn test_convert_without_rain_or_name() {
        let snapshot = parse(
            r#"{"cod":"200","main":{"temp":20,"humidity":40},"wind":{"speed":1}}"#,
        )
        .unwrap();
        assert_eq!(snapshot.city_name, UNKNOWN_CITY);
        assert_eq!(snapshot.rainfall, Decimal::ZERO);
    }

    #[test]
    fn test_convert_rejects_remote_error() {
        let err = parse(r#"{"cod":"404","message":"city not found"}"#).unwrap_err();
        assert!(matches!(err, WeatherError::Remote(_)));
    }
}
