use std::time::Duration;

use figment::{providers::Serialized, Figment, Jail};
use pretty_assertions::assert_eq;
use reelspin::{config::SpinConfig, easing::Easing, error::ConfigError};
use speculoos::prelude::*;

#[test]
fn test_defaults_match_reference_machine() {
    let config = SpinConfig::default();

    assert_eq!(config.reel_count, 3);
    assert_eq!(config.slots_per_reel, 3);
    assert_eq!(config.slot_size, 180.0);
    assert_eq!(config.easing(), Easing::Backout { amount: 0.5 });
    assert_eq!(config.longest_spin(), Duration::from_millis(2100 + 2 * 500));
    assert_that(&config.validate().is_ok()).is_true();
}

#[test]
fn test_environment_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("REELS_REEL_COUNT", "5");
        jail.set_env("REELS_MAX_EXTRA", "0");
        jail.set_env("REELS_SEED", "42");

        let config = SpinConfig::load().map_err(|e| e.to_string())?;

        assert_eq!(config.reel_count, 5);
        assert_eq!(config.max_extra, 0);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.slots_per_reel, 3);
        assert_eq!(config.base_duration_ms, 1500);
        Ok(())
    });
}

#[test]
fn test_load_without_environment_is_default() {
    Jail::expect_with(|_| {
        let config = SpinConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config, SpinConfig::default());
        Ok(())
    });
}

#[test]
fn test_invalid_environment_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("REELS_REEL_COUNT", "0");

        let error = SpinConfig::load().expect_err("zero reels should be rejected");
        assert!(matches!(error, ConfigError::Invalid { field: "reel_count", .. }), "{error}");
        Ok(())
    });
}

#[test]
fn test_malformed_environment_value_fails_to_load() {
    Jail::expect_with(|jail| {
        jail.set_env("REELS_SLOT_SIZE", "enormous");

        let error = SpinConfig::load().expect_err("a non-numeric slot size should not load");
        assert!(matches!(error, ConfigError::Load(_)), "{error}");
        Ok(())
    });
}

#[test]
fn test_validation_rejects_bad_values() {
    let cases = [
        (SpinConfig { slots_per_reel: 0, ..SpinConfig::default() }, "slots_per_reel"),
        (SpinConfig { slot_size: -1.0, ..SpinConfig::default() }, "slot_size"),
        (SpinConfig { slot_size: f32::NAN, ..SpinConfig::default() }, "slot_size"),
        (SpinConfig { backout_amount: -0.5, ..SpinConfig::default() }, "backout_amount"),
        (SpinConfig { frame_blur_gain: f32::INFINITY, ..SpinConfig::default() }, "frame_blur_gain"),
    ];

    for (config, expected) in cases {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected `{expected}` to be rejected, got {other:?}"),
        }
    }
}

#[test]
fn test_from_figment_merges_partial_sources() {
    let figment = Figment::from(Serialized::defaults(SpinConfig::default()))
        .merge(Serialized::default("slot_size", 90.0))
        .merge(Serialized::default("distance_step", 5.0));

    let config = SpinConfig::from_figment(figment).expect("config should load");

    assert_eq!(config.slot_size, 90.0);
    assert_eq!(config.distance(2, 1), 20.0 + 10.0 + 1.0);
}

#[test]
fn test_overflowing_durations_are_rejected() {
    let cases = [
        SpinConfig { base_duration_ms: u64::MAX - 10, ..SpinConfig::default() },
        SpinConfig { duration_step_ms: u64::MAX / 2, ..SpinConfig::default() },
        SpinConfig { max_extra: u32::MAX, extra_duration_ms: u64::MAX / 2, ..SpinConfig::default() },
        SpinConfig { base_duration_ms: 2 * 60 * 60 * 1000, ..SpinConfig::default() },
    ];

    for config in cases {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "base_duration_ms"),
            other => panic!("expected {config:?} to be rejected, got {other:?}"),
        }
    }
}

#[test]
fn test_duration_saturates_instead_of_overflowing() {
    let config = SpinConfig {
        base_duration_ms: u64::MAX - 10,
        ..SpinConfig::default()
    };

    assert_eq!(config.duration(2, 2), Duration::from_millis(u64::MAX));
}

#[test]
fn test_overflowing_environment_duration_fails_to_load() {
    Jail::expect_with(|jail| {
        jail.set_env("REELS_BASE_DURATION_MS", (u64::MAX - 10).to_string());

        let error = SpinConfig::load().expect_err("an overflowing duration should be rejected");
        assert!(matches!(error, ConfigError::Invalid { field: "base_duration_ms", .. }), "{error}");
        Ok(())
    });
}
