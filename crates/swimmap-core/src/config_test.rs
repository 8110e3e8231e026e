use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SWIMMAP_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.view_config_path, PathBuf::from("./config/view.yaml"));
    assert_eq!(cfg.facilities_path, PathBuf::from("./data/facilities.json"));
    assert!((cfg.min_selection_zoom - 14.0).abs() < f64::EPSILON);
    assert_eq!(cfg.popup_settle, Duration::from_millis(240));
    assert_eq!(cfg.scroll_duration, Duration::from_millis(120));
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("SWIMMAP_ENV", "test");
    map.insert("SWIMMAP_MIN_SELECTION_ZOOM", "15.5");
    map.insert("SWIMMAP_POPUP_SETTLE_MS", "300");
    map.insert("SWIMMAP_FACILITIES_PATH", "/tmp/pools.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Test);
    assert!((cfg.min_selection_zoom - 15.5).abs() < f64::EPSILON);
    assert_eq!(cfg.popup_settle, Duration::from_millis(300));
    assert_eq!(cfg.facilities_path, PathBuf::from("/tmp/pools.json"));
}

#[test]
fn build_app_config_rejects_non_numeric_settle_delay() {
    let mut map = HashMap::new();
    map.insert("SWIMMAP_POPUP_SETTLE_MS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SWIMMAP_POPUP_SETTLE_MS"
        ),
        "expected InvalidEnvVar(SWIMMAP_POPUP_SETTLE_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_out_of_range_zoom() {
    let mut map = HashMap::new();
    map.insert("SWIMMAP_MIN_SELECTION_ZOOM", "40");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(
            result,
            Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SWIMMAP_MIN_SELECTION_ZOOM"
        ),
        "expected InvalidEnvVar(SWIMMAP_MIN_SELECTION_ZOOM), got: {result:?}"
    );
}
