use super::{PolicyConfig, ThresholdPolicy};
use crate::error::EngineError;
use crate::logic::reading::SensorKind;

#[test]
fn test_default_policy() {
    let p = ThresholdPolicy::default_for(7);
    assert_eq!(p.exhibit_id(), 7);
    assert_eq!(p.temperature_min(), 18.0);
    assert_eq!(p.temperature_max(), 24.0);
    assert_eq!(p.humidity_min(), 40.0);
    assert_eq!(p.humidity_max(), 60.0);
    assert_eq!(p.vibration_max(), 0.5);
}

#[test]
fn test_reject_min_greater_than_max() {
    let result = ThresholdPolicy::new(1, (25.0, 18.0), (40.0, 60.0), 0.5);
    match result {
        Err(EngineError::Configuration(msg)) => {
            assert!(msg.contains("temperature_min"));
        }
        _ => panic!("Expected Configuration error"),
    }
}

#[test]
fn test_reject_negative_vibration() {
    let result = ThresholdPolicy::new(1, (18.0, 24.0), (40.0, 60.0), -0.1);
    assert!(matches!(result, Err(EngineError::Configuration(_))));
}

#[test]
fn test_reject_non_finite() {
    let result = ThresholdPolicy::new(1, (18.0, f64::INFINITY), (40.0, 60.0), 0.5);
    assert!(result.is_err());
}

#[test]
fn test_deserialize_validates() {
    let ok: ThresholdPolicy = serde_json::from_str(
        r#"{ "exhibit_id": 2, "temperature_min": 18.0, "temperature_max": 22.0 }"#,
    )
    .unwrap();
    assert_eq!(ok.temperature_max(), 22.0);
    assert_eq!(ok.humidity_max(), 60.0);

    let bad = serde_json::from_str::<ThresholdPolicy>(
        r#"{ "exhibit_id": 2, "humidity_min": 70.0, "humidity_max": 60.0 }"#,
    );
    assert!(bad.is_err());
}

#[test]
fn test_apply_partial_update() {
    let p = ThresholdPolicy::default_for(3);
    let updated = p
        .apply(&PolicyConfig {
            vibration_max: Some(0.3),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(updated.vibration_max(), 0.3);
    assert_eq!(updated.temperature_max(), 24.0);
    assert_eq!(updated.exhibit_id(), 3);

    let broken = p.apply(&PolicyConfig {
        temperature_min: Some(30.0),
        ..Default::default()
    });
    assert!(broken.is_err());
}

#[test]
fn test_bounds_range() {
    let p = ThresholdPolicy::default_for(1);
    assert_eq!(p.bounds(SensorKind::Temperature).range(), 6.0);
    assert_eq!(p.bounds(SensorKind::Humidity).range(), 20.0);
    assert_eq!(p.bounds(SensorKind::Vibration).range(), 0.5);
    assert!(p.bounds(SensorKind::Vibration).contains(0.0));
    assert!(!p.bounds(SensorKind::Temperature).contains(17.9));
}
