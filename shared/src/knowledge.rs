//! Crop knowledge base
//!
//! Maps a predicted crop name to cultivation guidance, common diseases and a
//! typical price band. Families are matched top-down by case-insensitive
//! substring; the first family with a matching pattern wins and anything
//! unmatched gets the generic record.

use crate::models::{CropDetails, CropFamily, CultivationStage, Disease, PriceBand};

/// How the display image keyword is derived for a family
#[derive(Debug, Clone, Copy)]
pub enum ImageKeyword {
    Fixed(&'static str),
    /// `<lowercased crop name>_fruit`
    FruitOfName,
}

/// One row of the family table
#[derive(Debug)]
pub struct FamilyRule {
    pub family: CropFamily,
    pub patterns: &'static [&'static str],
    pub description: &'static str,
    pub image: ImageKeyword,
    pub price: PriceBand,
    /// Replaces the generic guide when set
    pub guide: Option<&'static [(&'static str, &'static str)]>,
    pub diseases: &'static [(&'static str, &'static str, &'static str)],
}

const GENERIC_IMAGE: &str = "agriculture";
const GENERIC_PRICE: PriceBand = PriceBand::new(2000, 4000);
const GENERIC_TIPS: &str =
    "Monitor local mandi prices daily. Join a Farmer Producer Organization (FPO).";

const GENERIC_GUIDE: &[(&str, &str)] = &[
    ("Soil Prep", "Plough field twice. Apply farmyard manure."),
    ("Sowing", "Treat seeds with Trichoderma. Ensure proper spacing."),
    ("Vegetative", "Weed control is crucial. Apply NPK fertilizer."),
    ("Harvest", "Harvest when leaves turn yellow/brown."),
];

const GENERIC_DISEASES: &[(&str, &str, &str)] =
    &[("Leaf Spot", "Brown spots on leaves", "Copper Oxychloride spray")];

/// Ordered family table. Order matters: "rice bean" is paddy, not legume.
pub static FAMILY_RULES: &[FamilyRule] = &[
    FamilyRule {
        family: CropFamily::Paddy,
        patterns: &["rice", "paddy"],
        description: "Staple grain requiring high water. Best grown in clayey soil.",
        image: ImageKeyword::Fixed("rice_field"),
        price: PriceBand::new(2200, 4500),
        guide: Some(&[
            ("Nursery", "Raise seedlings. Maintain 2cm water level."),
            ("Tillering", "Apply Urea and Zinc. Monitor for Stem Borer."),
        ]),
        diseases: &[("Blast Disease", "Diamond lesions", "Tricyclazole 75 WP")],
    },
    FamilyRule {
        family: CropFamily::Maize,
        patterns: &["maize", "corn"],
        description: "High demand for feed and starch. Needs good drainage.",
        image: ImageKeyword::Fixed("corn_field"),
        price: PriceBand::new(1800, 2800),
        guide: None,
        diseases: &[("Fall Armyworm", "Ragged holes in leaves", "Emamectin Benzoate")],
    },
    FamilyRule {
        family: CropFamily::Cotton,
        patterns: &["cotton"],
        description: "The White Gold. Requires warm climate and black soil.",
        image: ImageKeyword::Fixed("cotton_plant"),
        price: PriceBand::new(6000, 9500),
        guide: None,
        diseases: &[("Pink Bollworm", "Internal boll damage", "Pheromone Traps")],
    },
    FamilyRule {
        family: CropFamily::Legume,
        patterns: &["chickpea", "lentil", "bean", "gram", "pea", "soybean"],
        description: "Protein rich legume. Excellent for nitrogen fixing.",
        image: ImageKeyword::Fixed("lentils"),
        price: PriceBand::new(5000, 9000),
        guide: None,
        diseases: &[("Wilt", "Sudden drooping", "Use resistant varieties")],
    },
    FamilyRule {
        family: CropFamily::Fruit,
        patterns: &["mango", "banana", "apple", "papaya", "grape", "orange"],
        description: "High value fruit crop. Focus on export quality.",
        image: ImageKeyword::FruitOfName,
        price: PriceBand::new(3000, 15000),
        guide: None,
        diseases: &[("Fruit Fly", "Blemished surface", "Fruit bagging")],
    },
];

/// Find the first family whose patterns occur in `crop_name`
pub fn match_family(crop_name: &str) -> Option<&'static FamilyRule> {
    let name = crop_name.to_lowercase();
    FAMILY_RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|p| name.contains(p)))
}

/// Look up guidance for a crop. Never fails.
pub fn lookup(crop_name: &str) -> CropDetails {
    let name = crop_name.to_lowercase();

    match match_family(crop_name) {
        Some(rule) => CropDetails {
            name: crop_name.to_string(),
            family: rule.family,
            description: rule.description.to_string(),
            image_keyword: match rule.image {
                ImageKeyword::Fixed(keyword) => keyword.to_string(),
                ImageKeyword::FruitOfName => format!("{}_fruit", name),
            },
            price_range: rule.price,
            guide: stages(rule.guide.unwrap_or(GENERIC_GUIDE)),
            diseases: diseases(rule.diseases),
            tips: GENERIC_TIPS.to_string(),
        },
        None => CropDetails {
            name: crop_name.to_string(),
            family: CropFamily::General,
            description: format!(
                "{} is a highly suitable crop optimized for your current soil and weather conditions.",
                crop_name
            ),
            image_keyword: GENERIC_IMAGE.to_string(),
            price_range: GENERIC_PRICE,
            guide: stages(GENERIC_GUIDE),
            diseases: diseases(GENERIC_DISEASES),
            tips: GENERIC_TIPS.to_string(),
        },
    }
}

fn stages(rows: &[(&str, &str)]) -> Vec<CultivationStage> {
    rows.iter()
        .map(|(stage, action)| CultivationStage {
            stage: stage.to_string(),
            action: action.to_string(),
        })
        .collect()
}

fn diseases(rows: &[(&str, &str, &str)]) -> Vec<Disease> {
    rows.iter()
        .map(|(name, symptom, cure)| Disease {
            name: name.to_string(),
            symptom: symptom.to_string(),
            cure: cure.to_string(),
        })
        .collect()
}
