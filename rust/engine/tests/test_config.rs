use std::io::Write;

use holdem_engine::config::{self, ConfigError, EngineConfig, ValueSource};
use holdem_engine::engine::Engine;
use holdem_engine::rules::StructureKind;
use serial_test::serial;
use tempfile::NamedTempFile;

const VARS: [&str; 5] = [
    "HOLDEM_CONFIG",
    "HOLDEM_SMALL_BET",
    "HOLDEM_STRUCTURE",
    "HOLDEM_MAX_RAISES",
    "HOLDEM_SEED",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn defaults_without_file_or_env() {
    clear_env();
    let resolved = config::load_with_sources().unwrap();
    assert_eq!(resolved.config, EngineConfig::default());
    assert_eq!(resolved.sources.small_bet, ValueSource::Default);
    assert_eq!(resolved.sources.seed, ValueSource::Default);
}

#[test]
#[serial]
fn file_overrides_defaults_and_env_overrides_file() {
    clear_env();
    let file = write_config("small_bet = 10\nstructure = \"no-limit\"\nseed = 99\n");
    std::env::set_var("HOLDEM_CONFIG", file.path());
    std::env::set_var("HOLDEM_SEED", "5");

    let resolved = config::load_with_sources().unwrap();
    assert_eq!(resolved.config.small_bet, 10);
    assert_eq!(resolved.config.structure, StructureKind::NoLimit);
    assert_eq!(resolved.config.max_raises, 3);
    assert_eq!(resolved.config.seed, Some(5));
    assert_eq!(resolved.sources.small_bet, ValueSource::File);
    assert_eq!(resolved.sources.structure, ValueSource::File);
    assert_eq!(resolved.sources.max_raises, ValueSource::Default);
    assert_eq!(resolved.sources.seed, ValueSource::Env);
    clear_env();
}

#[test]
#[serial]
fn env_structure_names_are_parsed() {
    clear_env();
    std::env::set_var("HOLDEM_STRUCTURE", "no-limit");
    std::env::set_var("HOLDEM_MAX_RAISES", "4");
    let cfg = config::load().unwrap();
    assert_eq!(cfg.structure, StructureKind::NoLimit);
    assert_eq!(cfg.max_raises, 4);

    std::env::set_var("HOLDEM_STRUCTURE", "spread-limit");
    assert!(matches!(config::load(), Err(ConfigError::Invalid(_))));
    clear_env();
}

#[test]
#[serial]
fn invalid_values_are_rejected() {
    clear_env();
    std::env::set_var("HOLDEM_SMALL_BET", "3");
    assert!(matches!(config::load(), Err(ConfigError::Invalid(_))));
    std::env::set_var("HOLDEM_SMALL_BET", "lots");
    assert!(matches!(config::load(), Err(ConfigError::Invalid(_))));
    clear_env();

    std::env::set_var("HOLDEM_MAX_RAISES", "0");
    assert!(matches!(config::load(), Err(ConfigError::Invalid(_))));
    clear_env();
}

#[test]
#[serial]
fn broken_file_is_a_parse_error() {
    clear_env();
    let file = write_config("small_bet = \"four\"\n");
    std::env::set_var("HOLDEM_CONFIG", file.path());
    assert!(matches!(config::load(), Err(ConfigError::Parse(_))));

    std::env::set_var("HOLDEM_CONFIG", "/nonexistent/holdem.toml");
    assert!(matches!(config::load(), Err(ConfigError::Io(_))));
    clear_env();
}

#[test]
fn seeded_configs_deal_identically() {
    let cfg = EngineConfig {
        seed: Some(42),
        structure: StructureKind::NoLimit,
        ..EngineConfig::default()
    };
    let hole_cards = || {
        let (mut engine, _events) = Engine::from_config(&cfg);
        let a = engine
            .add_player(holdem_engine::player::Player::new("a", 100))
            .unwrap();
        engine
            .add_player(holdem_engine::player::Player::new("b", 100))
            .unwrap();
        engine.start().unwrap();
        assert_eq!(engine.structure(), StructureKind::NoLimit);
        engine.table().get(a).unwrap().hole_cards().to_vec()
    };
    assert_eq!(hole_cards(), hole_cards());
}
