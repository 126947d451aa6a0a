//! Service config loader.
//!
//! Layers, lowest precedence first: built-in defaults, an optional strict YAML
//! file named by `COUNTER_CONFIG`, then environment variables.

pub mod schema;

use std::fs;

use counter_core::error::{CounterError, Result};

pub use schema::{CounterConfig, RedisSection};

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "COUNTER_CONFIG";

pub fn load_from_file(path: &str) -> Result<CounterConfig> {
    let cfg = parse_file(path)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<CounterConfig> {
    let cfg = parse_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load from the process environment.
pub fn load_from_env() -> Result<CounterConfig> {
    load_from_vars(std::env::vars())
}

/// Load from an explicit set of environment-style pairs.
pub fn load_from_vars<I, K, V>(vars: I) -> Result<CounterConfig>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let vars: Vec<(K, V)> = vars.into_iter().collect();

    let mut cfg = match vars.iter().find(|(k, _)| k.as_ref() == CONFIG_PATH_ENV) {
        Some((_, path)) => parse_file(path.as_ref())?,
        None => CounterConfig::default(),
    };
    for (k, v) in &vars {
        cfg.apply_env(k.as_ref(), v.as_ref())?;
    }

    cfg.validate()?;
    Ok(cfg)
}

fn parse_file(path: &str) -> Result<CounterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| CounterError::Config(format!("read config failed ({path}): {e}")))?;
    parse_str(&s)
}

fn parse_str(s: &str) -> Result<CounterConfig> {
    serde_yaml::from_str(s).map_err(|e| CounterError::Config(format!("invalid yaml: {e}")))
}
