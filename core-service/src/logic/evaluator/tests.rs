use super::{evaluate, RuleEvaluator};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::logic::policy::ThresholdPolicy;
use crate::logic::reading::{SensorKind, SensorReading};
use crate::logic::trend::ExhibitHistory;
use crate::logic::verdict::{Severity, ViolationKind};

fn policy() -> ThresholdPolicy {
    ThresholdPolicy::new(1, (18.0, 24.0), (40.0, 60.0), 0.5).unwrap()
}

fn history() -> ExhibitHistory {
    ExhibitHistory::new(20)
}

#[test]
fn test_three_violations_scenario() {
    let reading = SensorReading::new(1)
        .with_temperature(26.5)
        .with_humidity(75.0)
        .with_vibration(0.8);

    let verdict = evaluate(&reading, &policy(), &mut history(), &EngineConfig::default());

    assert!(verdict.is_anomaly());
    assert_eq!(verdict.violations().len(), 3);
    assert!(verdict.severity() >= Severity::Medium);

    let temp = &verdict.violations()[0];
    assert_eq!(temp.sensor_type, SensorKind::Temperature);
    assert!((temp.overshoot() - 2.5).abs() < 1e-9);

    let humidity = &verdict.violations()[1];
    assert_eq!(humidity.sensor_type, SensorKind::Humidity);
    assert!((humidity.overshoot() - 15.0).abs() < 1e-9);
    assert!((humidity.magnitude - 0.75).abs() < 1e-9);

    let vibration = &verdict.violations()[2];
    assert_eq!(vibration.sensor_type, SensorKind::Vibration);
    assert!((vibration.overshoot() - 0.3).abs() < 1e-9);

    // humidity has the largest normalized overshoot
    assert!((verdict.score() - 0.75).abs() < 1e-9);
    assert_eq!(verdict.severity(), Severity::High);
}

#[test]
fn test_in_range_no_history() {
    let reading = SensorReading::new(1).with_temperature(21.0);
    let verdict = evaluate(&reading, &policy(), &mut history(), &EngineConfig::default());

    assert!(!verdict.is_anomaly());
    assert!(verdict.violations().is_empty());
    assert_eq!(verdict.severity(), Severity::None);
    assert_eq!(verdict.score(), 0.0);
    assert!(verdict.explanation().is_none());
}

#[test]
fn test_flat_history_no_trend_violation() {
    let config = EngineConfig::default();
    let mut h = history();

    for _ in 0..10 {
        let v = evaluate(&SensorReading::new(1).with_temperature(21.0), &policy(), &mut h, &config);
        assert!(!v.is_anomaly());
    }

    let verdict = evaluate(&SensorReading::new(1).with_temperature(21.1), &policy(), &mut h, &config);
    assert!(!verdict.is_anomaly());
    assert!(verdict.violations().is_empty());
    assert_eq!(h.window(SensorKind::Temperature).unwrap().sample_count(), 11);
}

#[test]
fn test_small_steps_after_flat_history_stay_clear() {
    let config = EngineConfig::default();
    let mut h = history();

    for _ in 0..10 {
        evaluate(&SensorReading::new(1).with_temperature(21.0), &policy(), &mut h, &config);
    }

    for temp in [21.1, 21.2, 21.3] {
        let verdict = evaluate(&SensorReading::new(1).with_temperature(temp), &policy(), &mut h, &config);
        assert!(!verdict.is_anomaly(), "{} flagged: {:?}", temp, verdict.violations());
        assert_eq!(verdict.severity(), Severity::None);
    }
}

#[test]
fn test_empty_reading() {
    let verdict = evaluate(&SensorReading::new(1), &policy(), &mut history(), &EngineConfig::default());
    assert!(!verdict.is_anomaly());
    assert_eq!(verdict.severity(), Severity::None);
    assert!(verdict.violations().is_empty());
}

#[test]
fn test_single_temperature_violation() {
    for temp in [24.01, 25.0, 30.0, 60.0] {
        let reading = SensorReading::new(1).with_temperature(temp).with_humidity(50.0);
        let verdict = evaluate(&reading, &policy(), &mut history(), &EngineConfig::default());

        let temps: Vec<_> = verdict.violations_for(SensorKind::Temperature).collect();
        assert_eq!(temps.len(), 1);
        assert!(temps[0].magnitude > 0.0);
        assert!(verdict.is_anomaly());
    }
}

#[test]
fn test_score_monotonic_in_overshoot() {
    let config = EngineConfig::default();
    let mut previous_score = 0.0;
    let mut previous_severity = Severity::None;

    // up to 6°C overshoot on a 6°C band stays below the 1.0 clamp
    for step in 1..60 {
        let temp = 24.0 + step as f64 * 0.1;
        let verdict = evaluate(
            &SensorReading::new(1).with_temperature(temp),
            &policy(),
            &mut history(),
            &config,
        );
        assert!(verdict.score() > previous_score, "score must strictly increase at {}", temp);
        assert!(verdict.severity() >= previous_severity);
        previous_score = verdict.score();
        previous_severity = verdict.severity();
    }
}

#[test]
fn test_in_range_with_history_is_clear() {
    let config = EngineConfig::default();
    let mut h = history();
    let samples = [20.5, 21.0, 21.5, 21.0, 20.5, 21.5, 21.0];

    for t in samples {
        evaluate(
            &SensorReading::new(1).with_temperature(t).with_humidity(50.0).with_vibration(0.1),
            &policy(),
            &mut h,
            &config,
        );
    }

    let verdict = evaluate(
        &SensorReading::new(1).with_temperature(21.2).with_humidity(50.0).with_vibration(0.1),
        &policy(),
        &mut h,
        &config,
    );
    assert!(!verdict.is_anomaly());
    assert_eq!(verdict.severity(), Severity::None);
}

#[test]
fn test_trend_violation_inside_bounds() {
    let config = EngineConfig::default();
    let mut h = history();
    for t in [20.0, 22.0, 20.0, 22.0, 20.0, 22.0] {
        evaluate(&SensorReading::new(1).with_temperature(t), &policy(), &mut h, &config);
    }

    // still within 18-24 but 2.9σ above the mean of 21
    let verdict = evaluate(&SensorReading::new(1).with_temperature(23.9), &policy(), &mut h, &config);
    assert!(verdict.is_anomaly());
    assert_eq!(verdict.violations().len(), 1);
    assert_eq!(verdict.violations()[0].kind, ViolationKind::Trend);
    assert_eq!(verdict.severity(), Severity::Low);
}

#[test]
fn test_hard_and_trend_both_recorded() {
    let config = EngineConfig::default();
    let mut h = history();
    for t in [20.0, 22.0, 20.0, 22.0, 20.0, 22.0] {
        evaluate(&SensorReading::new(1).with_temperature(t), &policy(), &mut h, &config);
    }

    // 25°C: hard magnitude 1/6, trend magnitude 4/2.5 - 1 = 0.6
    let verdict = evaluate(&SensorReading::new(1).with_temperature(25.0), &policy(), &mut h, &config);
    assert_eq!(verdict.violations().len(), 2);
    assert_eq!(verdict.violations()[0].kind, ViolationKind::AboveMax);
    assert_eq!(verdict.violations()[1].kind, ViolationKind::Trend);
    assert!((verdict.score() - 1.0 / 6.0).abs() < 1e-9);
}

#[test]
fn test_trend_disabled() {
    let mut config = EngineConfig::default();
    config.trend.enabled = false;
    let mut h = history();
    for t in [20.0, 22.0, 20.0, 22.0, 20.0, 22.0] {
        evaluate(&SensorReading::new(1).with_temperature(t), &policy(), &mut h, &config);
    }
    let verdict = evaluate(&SensorReading::new(1).with_temperature(23.9), &policy(), &mut h, &config);
    assert!(!verdict.is_anomaly());
}

#[test]
fn test_history_updated_on_anomaly() {
    let mut h = history();
    evaluate(
        &SensorReading::new(1).with_temperature(40.0),
        &policy(),
        &mut h,
        &EngineConfig::default(),
    );
    assert_eq!(h.window(SensorKind::Temperature).unwrap().sample_count(), 1);
    assert!(h.window(SensorKind::Humidity).is_none());
}

#[test]
fn test_rule_evaluator_rejects_invalid_reading() {
    let evaluator = RuleEvaluator::default();
    let result = evaluator.evaluate(&SensorReading::new(1).with_humidity(f64::NAN), &policy());
    assert!(matches!(result, Err(EngineError::InputValidation { .. })));
    // rejected readings never touch history
    assert!(!evaluator.registry().contains(1));
}

#[test]
fn test_rule_evaluator_rejects_bad_config() {
    let mut config = EngineConfig::default();
    config.trend.min_samples = 0;
    assert!(RuleEvaluator::new(config).is_err());
}

#[test]
fn test_rule_evaluator_isolates_exhibits() {
    let evaluator = RuleEvaluator::default();
    evaluator
        .evaluate(&SensorReading::new(1).with_temperature(21.0), &policy())
        .unwrap();
    evaluator
        .evaluate(&SensorReading::new(2).with_temperature(21.0), &policy().for_exhibit(2))
        .unwrap();

    assert_eq!(evaluator.registry().len(), 2);
    let stats = evaluator.registry().snapshot(2).unwrap();
    assert_eq!(stats[&SensorKind::Temperature].sample_count, 1);
}
