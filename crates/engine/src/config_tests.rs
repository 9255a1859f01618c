use super::*;
use microbatch_runtime::{BATCH_INTERVAL_ENV, BATCH_SIZE_ENV};
use serial_test::serial;

fn clear_env() {
    unsafe {
        std::env::remove_var(BATCH_SIZE_ENV);
        std::env::remove_var(BATCH_INTERVAL_ENV);
    }
}

#[test]
fn new_validates_thresholds() {
    let cases: &[(usize, Duration, bool)] = &[
        (1, Duration::from_millis(1), true),
        (10, Duration::from_secs(1), true),
        (0, Duration::from_secs(1), false),
        (5, Duration::ZERO, false),
        (0, Duration::ZERO, false),
    ];

    for (size, interval, ok) in cases {
        let got = BatcherConfig::new(*size, *interval);
        assert_eq!(
            got.is_ok(),
            *ok,
            "size={size} interval={interval:?} gave {got:?}"
        );
        if let Err(err) = got {
            assert!(err.is_config(), "{err} should be a configuration error");
        }
    }
}

#[test]
fn zero_size_reported_before_zero_interval() {
    let err = BatcherConfig::new(0, Duration::ZERO).expect_err("invalid config");
    assert!(matches!(err, BatcherError::InvalidBatchSize(0)));
}

#[test]
fn default_is_valid() {
    let config = BatcherConfig::default();
    assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(config.batch_interval, DEFAULT_BATCH_INTERVAL);
    config.validate().expect("defaults validate");
}

#[test]
fn builder_setters_do_not_validate_until_asked() {
    let config = BatcherConfig::default().with_batch_size(0);
    assert!(config.validate().is_err());

    let config = BatcherConfig::default()
        .with_batch_size(3)
        .with_batch_interval(Duration::from_millis(20));
    assert_eq!(config.batch_size, 3);
    assert_eq!(config.batch_interval, Duration::from_millis(20));
    config.validate().expect("valid");
}

#[test]
#[serial]
fn from_env_applies_overrides() {
    clear_env();
    unsafe {
        std::env::set_var(BATCH_SIZE_ENV, "64");
        std::env::set_var(BATCH_INTERVAL_ENV, "250");
    }

    let config = BatcherConfig::from_env().expect("env config");
    clear_env();

    assert_eq!(config.batch_size, 64);
    assert_eq!(config.batch_interval, Duration::from_millis(250));
}

#[test]
#[serial]
fn from_env_falls_back_to_defaults() {
    clear_env();
    let config = BatcherConfig::from_env().expect("env config");
    assert_eq!(config, BatcherConfig::default());
}

#[test]
#[serial]
fn from_env_rejects_bad_values() {
    clear_env();

    unsafe { std::env::set_var(BATCH_SIZE_ENV, "lots") };
    let err = BatcherConfig::from_env().expect_err("unparsable size");
    clear_env();
    match err {
        BatcherError::InvalidEnv { var, value } => {
            assert_eq!(var, BATCH_SIZE_ENV);
            assert_eq!(value, "lots");
        }
        other => panic!("unexpected error: {other}"),
    }

    unsafe { std::env::set_var(BATCH_INTERVAL_ENV, "0") };
    let err = BatcherConfig::from_env().expect_err("zero interval");
    clear_env();
    assert!(matches!(err, BatcherError::InvalidBatchInterval(_)));
}
