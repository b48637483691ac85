use std::fs;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::StructureKind;

/// Table settings an engine is built from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Betting unit; the small blind is half of it, the big blind all of it
    pub small_bet: u32,
    pub structure: StructureKind,
    /// Fixed-limit raise cap per street
    pub max_raises: u32,
    /// Deterministic shuffling when set
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            small_bet: 4,
            structure: StructureKind::FixedLimit,
            max_raises: 3,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSources {
    pub small_bet: ValueSource,
    pub structure: ValueSource,
    pub max_raises: ValueSource,
    pub seed: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            small_bet: ValueSource::Default,
            structure: ValueSource::Default,
            max_raises: ValueSource::Default,
            seed: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: EngineConfig,
    pub sources: ConfigSources,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub const CONFIG_PATH_VAR: &str = "HOLDEM_CONFIG";

pub fn load() -> Result<EngineConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Resolves the configuration: defaults, then the TOML file named by
/// `HOLDEM_CONFIG`, then `HOLDEM_*` environment variables.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = EngineConfig::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.small_bet {
            cfg.small_bet = v;
            sources.small_bet = ValueSource::File;
        }
        if let Some(v) = f.structure {
            cfg.structure = v;
            sources.structure = ValueSource::File;
        }
        if let Some(v) = f.max_raises {
            cfg.max_raises = v;
            sources.max_raises = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
    }

    if let Some(v) = env_value("HOLDEM_SMALL_BET") {
        cfg.small_bet = v
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("small bet '{v}'")))?;
        sources.small_bet = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_STRUCTURE") {
        cfg.structure = parse_structure(&v)
            .ok_or_else(|| ConfigError::Invalid(format!("betting structure '{v}'")))?;
        sources.structure = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_MAX_RAISES") {
        cfg.max_raises = v
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("max raises '{v}'")))?;
        sources.max_raises = ValueSource::Env;
    }
    if let Some(v) = env_value("HOLDEM_SEED") {
        cfg.seed = Some(
            v.parse()
                .map_err(|_| ConfigError::Invalid(format!("seed '{v}'")))?,
        );
        sources.seed = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    small_bet: Option<u32>,
    #[serde(default)]
    structure: Option<StructureKind>,
    #[serde(default)]
    max_raises: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_structure(s: &str) -> Option<StructureKind> {
    match s.to_ascii_lowercase().as_str() {
        "fixed-limit" | "fixed_limit" | "limit" => Some(StructureKind::FixedLimit),
        "no-limit" | "no_limit" | "nolimit" => Some(StructureKind::NoLimit),
        _ => None,
    }
}

pub fn validate(cfg: &EngineConfig) -> Result<(), ConfigError> {
    if cfg.small_bet < 2 || cfg.small_bet % 2 != 0 {
        return Err(ConfigError::Invalid(
            "small_bet must be an even number >= 2".into(),
        ));
    }
    if cfg.max_raises == 0 {
        return Err(ConfigError::Invalid("max_raises must be >= 1".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_small_bet_is_rejected() {
        let cfg = EngineConfig {
            small_bet: 5,
            ..EngineConfig::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
        assert!(validate(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn structure_names() {
        assert_eq!(parse_structure("No-Limit"), Some(StructureKind::NoLimit));
        assert_eq!(parse_structure("fixed-limit"), Some(StructureKind::FixedLimit));
        assert_eq!(parse_structure("pot-limit"), None);
    }
}
