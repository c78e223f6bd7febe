//! Feature encoding and schema alignment
//!
//! Encoding mirrors the training-time one-hot step: numeric fields keep their
//! column name, every present categorical value becomes `<FIELD>_<value> = 1`.
//! Alignment then reindexes onto the exact column list the model was trained
//! on. A column the request did not produce is zero; a column the model never
//! saw is dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared::{CategoricalField, NumericField, Observation};

/// One observation after one-hot expansion, keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedFeatures {
    values: BTreeMap<String, f64>,
}

impl EncodedFeatures {
    pub fn encode(observation: &Observation) -> Self {
        let mut values = BTreeMap::new();

        for field in NumericField::ALL {
            values.insert(field.column().to_string(), observation.numeric(field));
        }
        for field in CategoricalField::ALL {
            if let Some(value) = observation.categorical(field) {
                values.insert(field.one_hot_column(value), 1.0);
            }
        }

        Self { values }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered column list the model was trained on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    columns: Vec<String>,
}

/// Accepted on-disk layouts of the feature-name artifact
#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureNamesFile {
    List(Vec<String>),
    Object { features: Vec<String> },
}

impl<'de> Deserialize<'de> for FeatureSchema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let columns = match FeatureNamesFile::deserialize(deserializer)? {
            FeatureNamesFile::List(columns) => columns,
            FeatureNamesFile::Object { features } => features,
        };
        Ok(Self { columns })
    }
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Dense row in schema order, zero-filled
    pub fn align(&self, encoded: &EncodedFeatures) -> Vec<f64> {
        self.columns
            .iter()
            .map(|column| encoded.get(column).unwrap_or(0.0))
            .collect()
    }

    /// Encoded columns that alignment will drop
    pub fn unknown_columns<'a>(&self, encoded: &'a EncodedFeatures) -> Vec<&'a str> {
        encoded
            .columns()
            .filter(|c| !self.columns.iter().any(|s| s.as_str() == *c))
            .collect()
    }
}
