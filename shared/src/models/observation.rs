//! Soil and weather observations submitted with a prediction request

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::validation::parse_numeric_field;

/// Numeric inputs, passed through to the model under their own column name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Temperature,
    Humidity,
    Ph,
    Rainfall,
    Windspeed,
}

impl NumericField {
    pub const ALL: [NumericField; 5] = [
        NumericField::Temperature,
        NumericField::Humidity,
        NumericField::Ph,
        NumericField::Rainfall,
        NumericField::Windspeed,
    ];

    /// Name of the form field
    pub fn form_name(&self) -> &'static str {
        match self {
            NumericField::Temperature => "temperature",
            NumericField::Humidity => "humidity",
            NumericField::Ph => "ph",
            NumericField::Rainfall => "rainfall",
            NumericField::Windspeed => "windspeed",
        }
    }

    /// Name of the training column
    pub fn column(&self) -> &'static str {
        match self {
            NumericField::Temperature => "TEMPERATURE",
            NumericField::Humidity => "HUMIDITY",
            NumericField::Ph => "PH",
            NumericField::Rainfall => "RAINFALL",
            NumericField::Windspeed => "WINDSPEED",
        }
    }
}

/// Categorical inputs, one-hot expanded before inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    SoilType,
    Season,
    GrowthStage,
    FertilizerType,
    PesticideUsage,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::SoilType,
        CategoricalField::Season,
        CategoricalField::GrowthStage,
        CategoricalField::FertilizerType,
        CategoricalField::PesticideUsage,
    ];

    pub fn form_name(&self) -> &'static str {
        match self {
            CategoricalField::SoilType => "soil_type",
            CategoricalField::Season => "season",
            CategoricalField::GrowthStage => "growth_stage",
            CategoricalField::FertilizerType => "fertilizer_type",
            CategoricalField::PesticideUsage => "pesticide_usage",
        }
    }

    /// Column prefix used by the one-hot encoding, e.g. `SOIL_TYPE`
    pub fn column(&self) -> &'static str {
        match self {
            CategoricalField::SoilType => "SOIL_TYPE",
            CategoricalField::Season => "SEASON",
            CategoricalField::GrowthStage => "GROWTH_STAGE",
            CategoricalField::FertilizerType => "FERTILIZER_TYPE",
            CategoricalField::PesticideUsage => "PESTICIDE_USAGE",
        }
    }

    /// Encoded column name for one value of this field
    pub fn one_hot_column(&self, value: &str) -> String {
        format!("{}_{}", self.column(), value)
    }
}

/// Form values exactly as submitted. Nothing here has been checked yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    #[serde(default, deserialize_with = "text_or_number")]
    pub temperature: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub humidity: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub ph: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub rainfall: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub windspeed: Option<String>,
    #[serde(default)]
    pub soil_type: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub growth_stage: Option<String>,
    #[serde(default)]
    pub fertilizer_type: Option<String>,
    #[serde(default)]
    pub pesticide_usage: Option<String>,
}

/// A numeric field as sent by a form (text) or a JSON client (number)
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<TextOrNumber>::deserialize(deserializer)?.map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        }),
    )
}

impl RawObservation {
    pub fn numeric(&self, field: NumericField) -> Option<&str> {
        match field {
            NumericField::Temperature => self.temperature.as_deref(),
            NumericField::Humidity => self.humidity.as_deref(),
            NumericField::Ph => self.ph.as_deref(),
            NumericField::Rainfall => self.rainfall.as_deref(),
            NumericField::Windspeed => self.windspeed.as_deref(),
        }
    }

    pub fn categorical(&self, field: CategoricalField) -> Option<&str> {
        match field {
            CategoricalField::SoilType => self.soil_type.as_deref(),
            CategoricalField::Season => self.season.as_deref(),
            CategoricalField::GrowthStage => self.growth_stage.as_deref(),
            CategoricalField::FertilizerType => self.fertilizer_type.as_deref(),
            CategoricalField::PesticideUsage => self.pesticide_usage.as_deref(),
        }
    }

    /// Coerce every numeric field, collecting one error per bad field
    pub fn validate(&self) -> Result<Observation, ObservationError> {
        let mut errors = Vec::new();
        let mut values = [0.0_f64; 5];

        for (slot, field) in values.iter_mut().zip(NumericField::ALL) {
            match parse_numeric_field(self.numeric(field)) {
                Ok(v) => *slot = v,
                Err(message) => errors.push(FieldError::new(field.form_name(), message)),
            }
        }

        if !errors.is_empty() {
            return Err(ObservationError { errors });
        }

        let categorical = |field| {
            self.categorical(field)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let [temperature, humidity, ph, rainfall, windspeed] = values;
        Ok(Observation {
            temperature,
            humidity,
            ph,
            rainfall,
            windspeed,
            soil_type: categorical(CategoricalField::SoilType),
            season: categorical(CategoricalField::Season),
            growth_stage: categorical(CategoricalField::GrowthStage),
            fertilizer_type: categorical(CategoricalField::FertilizerType),
            pesticide_usage: categorical(CategoricalField::PesticideUsage),
        })
    }
}

/// A validated observation, echoed back with the recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
    pub windspeed: f64,
    pub soil_type: Option<String>,
    pub season: Option<String>,
    pub growth_stage: Option<String>,
    pub fertilizer_type: Option<String>,
    pub pesticide_usage: Option<String>,
}

impl Observation {
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Temperature => self.temperature,
            NumericField::Humidity => self.humidity,
            NumericField::Ph => self.ph,
            NumericField::Rainfall => self.rainfall,
            NumericField::Windspeed => self.windspeed,
        }
    }

    pub fn categorical(&self, field: CategoricalField) -> Option<&str> {
        match field {
            CategoricalField::SoilType => self.soil_type.as_deref(),
            CategoricalField::Season => self.season.as_deref(),
            CategoricalField::GrowthStage => self.growth_stage.as_deref(),
            CategoricalField::FertilizerType => self.fertilizer_type.as_deref(),
            CategoricalField::PesticideUsage => self.pesticide_usage.as_deref(),
        }
    }
}

/// A problem with a single form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Raised when one or more numeric fields cannot be coerced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input in field(s): {}", self.field_names().join(", "))]
pub struct ObservationError {
    pub errors: Vec<FieldError>,
}

impl ObservationError {
    pub fn field_names(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn mentions(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawObservation {
        RawObservation {
            temperature: Some("25.0".into()),
            humidity: Some("80".into()),
            ph: Some("6.5".into()),
            rainfall: Some("200".into()),
            windspeed: Some("5".into()),
            soil_type: Some("Clayey".into()),
            season: Some("Kharif".into()),
            growth_stage: Some("Vegetative".into()),
            fertilizer_type: Some("Urea".into()),
            pesticide_usage: Some("Low".into()),
        }
    }

    #[test]
    fn test_validate_complete_form() {
        let obs = raw().validate().unwrap();
        assert_eq!(obs.temperature, 25.0);
        assert_eq!(obs.ph, 6.5);
        assert_eq!(obs.soil_type.as_deref(), Some("Clayey"));
    }

    #[test]
    fn test_validate_reports_every_bad_field() {
        let mut form = raw();
        form.temperature = Some("not-a-number".into());
        form.ph = None;

        let err = form.validate().unwrap_err();
        assert!(err.mentions("temperature"));
        assert!(err.mentions("ph"));
        assert!(!err.mentions("humidity"));
        assert_eq!(err.errors.len(), 2);
    }

    #[test]
    fn test_blank_categorical_is_absent() {
        let mut form = raw();
        form.season = Some("   ".into());
        let obs = form.validate().unwrap();
        assert_eq!(obs.season, None);
    }

    #[test]
    fn test_one_hot_column_naming() {
        assert_eq!(
            CategoricalField::SoilType.one_hot_column("Clayey"),
            "SOIL_TYPE_Clayey"
        );
        assert_eq!(
            CategoricalField::PesticideUsage.one_hot_column("Low"),
            "PESTICIDE_USAGE_Low"
        );
    }

    #[test]
    fn test_raw_observation_accepts_partial_json() {
        let form: RawObservation = serde_json::from_str(r#"{"temperature":"21"}"#).unwrap();
        assert_eq!(form.temperature.as_deref(), Some("21"));
        assert!(form.humidity.is_none());
    }

    #[test]
    fn test_raw_observation_accepts_json_numbers() {
        let form: RawObservation = serde_json::from_str(
            r#"{"temperature":25.5,"humidity":80,"ph":"6.5","rainfall":null,"soil_type":"Clayey"}"#,
        )
        .unwrap();
        assert_eq!(form.temperature.as_deref(), Some("25.5"));
        assert_eq!(form.humidity.as_deref(), Some("80"));
        assert_eq!(form.ph.as_deref(), Some("6.5"));
        assert!(form.rainfall.is_none());

        let obs = RawObservation {
            windspeed: Some("5".into()),
            rainfall: Some("200".into()),
            ..form
        }
        .validate()
        .unwrap();
        assert_eq!(obs.temperature, 25.5);
        assert_eq!(obs.humidity, 80.0);
    }

    #[test]
    fn test_bad_text_next_to_numbers_is_reported_per_field() {
        let form: RawObservation = serde_json::from_str(
            r#"{"temperature":"not-a-number","humidity":80,"ph":6.5,"rainfall":200,"windspeed":5}"#,
        )
        .unwrap();
        let err = form.validate().unwrap_err();
        assert_eq!(err.field_names(), vec!["temperature"]);
    }
}
