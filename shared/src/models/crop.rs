//! Agronomic guidance attached to a recommended crop

use serde::{Deserialize, Serialize};

/// Crop families known to the knowledge base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropFamily {
    Paddy,
    Maize,
    Cotton,
    Legume,
    Fruit,
    /// No pattern matched; generic guidance
    General,
}

/// Inclusive price band in currency units per quintal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: u32,
    pub max: u32,
}

impl PriceBand {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: u32) -> bool {
        price >= self.min && price <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CultivationStage {
    pub stage: String,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disease {
    pub name: String,
    pub symptom: String,
    pub cure: String,
}

/// Everything shown next to a recommendation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropDetails {
    pub name: String,
    pub family: CropFamily,
    pub description: String,
    pub image_keyword: String,
    pub price_range: PriceBand,
    pub guide: Vec<CultivationStage>,
    pub diseases: Vec<Disease>,
    pub tips: String,
}
