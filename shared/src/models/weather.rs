//! Weather data models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::RawObservation;

/// Hours in a day, used to extrapolate short rain readings
const HOURS_PER_DAY: f64 = 24.0;

/// Current conditions used to pre-fill the prediction form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub city_name: String,
    pub temperature: Decimal,
    pub humidity: i32,
    pub windspeed: Decimal,
    /// Estimated daily rainfall in mm
    pub rainfall: Decimal,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Form values a user would otherwise type in by hand
    pub fn prefill(&self) -> RawObservation {
        RawObservation {
            temperature: Some(self.temperature.to_string()),
            humidity: Some(self.humidity.to_string()),
            rainfall: Some(self.rainfall.to_string()),
            windspeed: Some(self.windspeed.to_string()),
            ..RawObservation::default()
        }
    }
}

/// Extrapolate a 1h (preferred) or 3h rain reading to a daily estimate.
///
/// The reading is multiplied by 24 and rounded to 2 decimal places; a missing
/// or non-positive reading gives zero. This is a rough approximation, not a
/// forecast.
pub fn extrapolate_daily_rainfall(rain_1h: Option<f64>, rain_3h: Option<f64>) -> Decimal {
    let reading = rain_1h
        .filter(|r| *r != 0.0)
        .or(rain_3h)
        .unwrap_or(0.0);

    if reading.is_nan() || reading <= 0.0 {
        return Decimal::ZERO;
    }

    Decimal::from_f64_retain(reading * HOURS_PER_DAY)
        .unwrap_or_default()
        .round_dp(2)
}
