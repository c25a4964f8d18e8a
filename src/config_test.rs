#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_nothing_set() {
    let config = EngineConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.grid_size, 5);
    assert_eq!(config.root_title, "App");
    assert_eq!(config.root_frame, Rect::new(0.0, 0.0, 600.0, 400.0));
}

#[test]
fn overrides_are_applied() {
    let config = EngineConfig::from_lookup(lookup_from(&[
        (ENV_GRID_SIZE, "10"),
        (ENV_ROOT_TITLE, "Main"),
        (ENV_ROOT_WIDTH, " 800 "),
        (ENV_ROOT_HEIGHT, "450.5"),
    ]))
    .unwrap();
    assert_eq!(config.grid_size, 10);
    assert_eq!(config.root_title, "Main");
    assert_eq!(config.root_frame.width, 800.0);
    assert_eq!(config.root_frame.height, 450.5);
}

#[test]
fn unparsable_grid_is_rejected() {
    let err = EngineConfig::from_lookup(lookup_from(&[(ENV_GRID_SIZE, "five")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { var: ENV_GRID_SIZE, .. }));
}

#[test]
fn zero_grid_is_rejected() {
    let err = EngineConfig::from_lookup(lookup_from(&[(ENV_GRID_SIZE, "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroGrid));
}

#[test]
fn degenerate_root_is_rejected() {
    let err = EngineConfig::from_lookup(lookup_from(&[(ENV_ROOT_WIDTH, "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::DegenerateRoot { .. }));
}

#[test]
fn blank_root_title_is_rejected() {
    let err = EngineConfig::from_lookup(lookup_from(&[(ENV_ROOT_TITLE, "   ")])).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyRootTitle));
}
