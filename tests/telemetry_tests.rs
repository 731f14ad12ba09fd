use chart_geometry::telemetry::{DEFAULT_DIRECTIVE, LOG_ENV_VAR, filter_directives, init_default_tracing};

#[test]
fn filter_directives_fall_back_to_the_crate_default() {
    let directives = filter_directives();
    assert!(!directives.trim().is_empty());
    let configured = [LOG_ENV_VAR, "RUST_LOG"]
        .into_iter()
        .any(|name| std::env::var(name).is_ok_and(|value| !value.trim().is_empty()));
    if !configured {
        assert_eq!(directives, DEFAULT_DIRECTIVE);
    }
}

#[cfg(not(feature = "telemetry"))]
#[test]
fn tracing_init_is_a_no_op_without_the_feature() {
    assert!(!init_default_tracing());
}

#[cfg(feature = "telemetry")]
#[test]
fn tracing_init_only_succeeds_once() {
    let _ = init_default_tracing();
    assert!(!init_default_tracing());
}
