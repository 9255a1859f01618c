use super::*;
use serial_test::serial;

fn with_env<T>(var: &str, value: Option<&str>, f: impl FnOnce() -> T) -> T {
    match value {
        Some(v) => unsafe { std::env::set_var(var, v) },
        None => unsafe { std::env::remove_var(var) },
    }
    let out = f();
    unsafe { std::env::remove_var(var) };
    out
}

#[test]
#[serial]
fn env_batch_size_parses_cases() {
    let cases: &[(Option<&str>, Option<usize>)] = &[
        (None, None),
        (Some(""), None),
        (Some("   "), None),
        (Some("1"), Some(1)),
        (Some("25"), Some(25)),
        (Some(" 42 "), Some(42)),
        (Some("0"), Some(0)),
    ];

    for (value, expected) in cases {
        let got = with_env(BATCH_SIZE_ENV, *value, env_batch_size)
            .expect("valid batch size value");
        assert_eq!(
            got, *expected,
            "env {:?} should yield {:?}, got {:?}",
            value, expected, got
        );
    }
}

#[test]
#[serial]
fn env_batch_size_rejects_garbage() {
    for bad in ["ten", "-3", "1.5"] {
        let err = with_env(BATCH_SIZE_ENV, Some(bad), env_batch_size)
            .expect_err("garbage should be rejected");
        assert_eq!(err.var, BATCH_SIZE_ENV);
        assert_eq!(err.value, bad);
    }
}

#[test]
#[serial]
fn env_batch_interval_reads_milliseconds() {
    let got = with_env(BATCH_INTERVAL_ENV, Some("250"), env_batch_interval)
        .expect("valid interval");
    assert_eq!(got, Some(Duration::from_millis(250)));

    let unset = with_env(BATCH_INTERVAL_ENV, None, env_batch_interval).expect("unset is fine");
    assert_eq!(unset, None);

    let err = with_env(BATCH_INTERVAL_ENV, Some("soon"), env_batch_interval)
        .expect_err("non-numeric interval");
    assert_eq!(err.var, BATCH_INTERVAL_ENV);
}

#[test]
fn defaults_are_positive() {
    assert!(DEFAULT_BATCH_SIZE > 0);
    assert!(!DEFAULT_BATCH_INTERVAL.is_zero());
}
