//! Recommendation pipeline tests
//!
//! Covers artifact loading from disk, the degraded bundle, input validation,
//! feature alignment and the enriched end-to-end result.

mod common;

use crop_advisor::ml::{
    recommend, resolve_artifact, ArtifactError, ArtifactKind, EncodedFeatures,
    FeatureSchema, ModelArtifacts, ModelBundle, PredictError,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{CropFamily, Observation, RawObservation};

fn raw_from(form: serde_json::Value) -> RawObservation {
    serde_json::from_value(form).unwrap()
}

// ============================================================================
// End-to-End
// ============================================================================

#[test]
fn test_rice_stub_end_to_end() {
    let mut rng = StdRng::seed_from_u64(42);
    let result = recommend(&common::rice_bundle(), &raw_from(common::valid_form()), &mut rng)
        .unwrap();

    assert_eq!(result.crop, "Rice");
    assert_eq!(result.details.family, CropFamily::Paddy);
    assert_eq!(result.details.image_keyword, "rice_field");
    assert_eq!(result.market.prices.len(), 7);
    assert!(result
        .market
        .prices
        .iter()
        .all(|p| (2200..=4500).contains(p)));
    assert_eq!(result.market.demand[2], 10);
    assert!(result.market.simulated);
    assert_eq!(result.observation.temperature, 25.5);
}

#[test]
fn test_unknown_categories_still_predict() {
    let mut form = common::valid_form();
    form["soil_type"] = "Volcanic".into();
    form["season"] = "".into();

    let mut rng = StdRng::seed_from_u64(1);
    let result = recommend(&common::rice_bundle(), &raw_from(form), &mut rng).unwrap();
    assert_eq!(result.crop, "Rice");
    assert_eq!(result.observation.season, None);
}

#[test]
fn test_stub_predicting_unlisted_crop_gets_generic_details() {
    let mut artifacts = common::stub_artifacts(0);
    artifacts.label_encoder = crop_advisor::ml::LabelEncoder::new(vec![
        "Quinoa".into(),
        "Maize".into(),
        "Rice".into(),
    ]);

    let mut rng = StdRng::seed_from_u64(5);
    let result = recommend(
        &ModelBundle::Ready(artifacts),
        &raw_from(common::valid_form()),
        &mut rng,
    )
    .unwrap();

    assert_eq!(result.details.family, CropFamily::General);
    assert!(result.details.description.contains("Quinoa"));
    assert!(result.market.prices.iter().all(|p| (2000..=4000).contains(p)));
}

// ============================================================================
// Failure Modes
// ============================================================================

#[test]
fn test_degraded_bundle_rejects_every_input() {
    let bundle = common::degraded_bundle();
    let mut rng = StdRng::seed_from_u64(1);

    for raw in [raw_from(common::valid_form()), RawObservation::default()] {
        assert!(matches!(
            recommend(&bundle, &raw, &mut rng),
            Err(PredictError::ModelUnavailable)
        ));
    }
}

#[test]
fn test_non_numeric_temperature_is_invalid_input() {
    let mut form = common::valid_form();
    form["temperature"] = "not-a-number".into();

    let mut rng = StdRng::seed_from_u64(1);
    match recommend(&common::rice_bundle(), &raw_from(form), &mut rng) {
        Err(PredictError::InvalidInput(e)) => {
            assert!(e.mentions("temperature"));
            assert_eq!(e.errors.len(), 1);
        }
        other => panic!("expected invalid input, got {:?}", other.map(|r| r.crop)),
    }
}

#[test]
fn test_label_encoder_too_small_is_model_error() {
    let mut artifacts = common::stub_artifacts(2);
    artifacts.label_encoder = crop_advisor::ml::LabelEncoder::new(vec!["Cotton".into()]);

    let mut rng = StdRng::seed_from_u64(1);
    let err = recommend(
        &ModelBundle::Ready(artifacts),
        &raw_from(common::valid_form()),
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(err, PredictError::Model(_)));
}

// ============================================================================
// Artifact Loading
// ============================================================================

#[test]
fn test_load_exported_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    common::write_stub_artifacts(dir.path());

    let bundle = ModelBundle::load(dir.path());
    assert!(bundle.is_ready());
    let artifacts = bundle.artifacts().unwrap();
    assert_eq!(artifacts.schema.len(), common::STUB_COLUMNS.len());
    assert!(artifacts.consistency_warnings().is_empty());

    let mut rng = StdRng::seed_from_u64(3);
    let result = recommend(&bundle, &raw_from(common::valid_form()), &mut rng).unwrap();
    assert_eq!(result.crop, "Rice");
}

#[test]
fn test_empty_directory_is_degraded() {
    let dir = tempfile::tempdir().unwrap();

    match ModelArtifacts::load(dir.path()) {
        Err(ArtifactError::Missing(kinds)) => assert_eq!(kinds, ArtifactKind::ALL.to_vec()),
        other => panic!("expected missing artifacts, got {:?}", other.map(|_| ())),
    }

    let bundle = ModelBundle::load(dir.path());
    assert!(!bundle.is_ready());
    assert_eq!(bundle.status(), "degraded");
}

#[test]
fn test_missing_directory_is_degraded() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    assert!(matches!(
        ModelArtifacts::load(&missing),
        Err(ArtifactError::DirectoryUnreadable { .. })
    ));
    assert!(!ModelBundle::load(&missing).is_ready());
}

#[test]
fn test_single_missing_artifact_is_named() {
    let dir = tempfile::tempdir().unwrap();
    common::write_stub_artifacts(dir.path());
    std::fs::remove_file(dir.path().join("scaler_final_perfected.json")).unwrap();

    match ModelArtifacts::load(dir.path()) {
        Err(ArtifactError::Missing(kinds)) => assert_eq!(kinds, vec![ArtifactKind::Scaler]),
        other => panic!("expected missing scaler, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_corrupt_artifact_is_degraded() {
    let dir = tempfile::tempdir().unwrap();
    common::write_stub_artifacts(dir.path());
    std::fs::write(dir.path().join("label_encoder_final_perfected.json"), "{not json").unwrap();

    assert!(matches!(
        ModelArtifacts::load(dir.path()),
        Err(ArtifactError::Parse {
            kind: ArtifactKind::LabelEncoder,
            ..
        })
    ));
}

#[test]
fn test_duplicate_artifacts_pick_greatest_name() {
    let dir = tempfile::tempdir().unwrap();
    common::write_stub_artifacts(dir.path());
    std::fs::write(
        dir.path().join("feature_names_2023.json"),
        r#"["TEMPERATURE"]"#,
    )
    .unwrap();
    // Not an artifact: wrong extension
    std::fs::write(dir.path().join("scaler_zzz.pkl"), "binary").unwrap();

    let schema = resolve_artifact(dir.path(), ArtifactKind::FeatureNames)
        .unwrap()
        .unwrap();
    assert!(schema.ends_with("feature_names_final_perfected.json"));
    let scaler = resolve_artifact(dir.path(), ArtifactKind::Scaler)
        .unwrap()
        .unwrap();
    assert!(scaler.ends_with("scaler_final_perfected.json"));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn category() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("Clayey".to_string())),
        Just(Some("Sandy".to_string())),
        Just(Some("Kharif".to_string())),
        "[A-Za-z]{1,8}".prop_map(Some),
    ]
}

fn observation_strategy() -> impl Strategy<Value = Observation> {
    (
        (-50.0..60.0f64, 0.0..100.0f64, 0.0..14.0f64, 0.0..5000.0f64, 0.0..60.0f64),
        (category(), category(), category(), category(), category()),
    )
        .prop_map(
            |(
                (temperature, humidity, ph, rainfall, windspeed),
                (soil_type, season, growth_stage, fertilizer_type, pesticide_usage),
            )| Observation {
                temperature,
                humidity,
                ph,
                rainfall,
                windspeed,
                soil_type,
                season,
                growth_stage,
                fertilizer_type,
                pesticide_usage,
            },
        )
}

proptest! {
    /// Aligned rows always have the schema's width and order
    #[test]
    fn test_alignment_matches_schema(observation in observation_strategy()) {
        let schema = FeatureSchema::new(common::STUB_COLUMNS.iter().map(|s| s.to_string()).collect());
        let encoded = EncodedFeatures::encode(&observation);
        let row = schema.align(&encoded);

        prop_assert_eq!(row.len(), schema.len());
        for (value, column) in row.iter().zip(schema.columns()) {
            prop_assert_eq!(*value, encoded.get(column).unwrap_or(0.0));
        }
        prop_assert_eq!(row[0], observation.temperature);
        prop_assert_eq!(row[3], observation.rainfall);
    }

    /// Every valid observation gets a recommendation from a ready bundle
    #[test]
    fn test_ready_bundle_always_recommends(observation in observation_strategy(), seed in any::<u64>()) {
        let artifacts = common::stub_artifacts(1);
        let crop = artifacts.predict(&observation).unwrap();
        prop_assert_eq!(crop.as_str(), "Maize");

        let details = shared::lookup(&crop);
        let mut rng = StdRng::seed_from_u64(seed);
        let market = crop_advisor::ml::simulate_market(details.price_range, &mut rng);
        prop_assert!(market.prices.iter().all(|p| details.price_range.contains(*p)));
    }
}
