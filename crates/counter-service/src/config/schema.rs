use std::time::Duration;

use counter_core::error::{CounterError, Result};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterConfig {
    /// Primary (counter) listener port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Administrative listener port (health, metrics, about).
    #[serde(default = "default_admin_port")]
    pub admin_port: u16,

    #[serde(
        default = "default_graceful_shutdown_timeout",
        deserialize_with = "de_duration"
    )]
    pub graceful_shutdown_timeout: Duration,

    #[serde(default)]
    pub redis: RedisSection,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            admin_port: default_admin_port(),
            graceful_shutdown_timeout: default_graceful_shutdown_timeout(),
            redis: RedisSection::default(),
        }
    }
}

impl CounterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.graceful_shutdown_timeout.is_zero() {
            return Err(CounterError::Config(
                "graceful_shutdown_timeout must be greater than zero".into(),
            ));
        }

        self.redis.validate()?;

        Ok(())
    }

    /// Apply one environment override. Unknown keys are ignored.
    pub fn apply_env(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "PORT" => self.port = parse_env(key, value)?,
            "ADMINPORT" => self.admin_port = parse_env(key, value)?,
            "GRACEFULSHUTDOWNTIMEOUT" => {
                self.graceful_shutdown_timeout = parse_env_duration(key, value)?
            }
            "REDIS_URL" => self.redis.url = value.to_string(),
            "REDIS_PW" => self.redis.password = value.to_string(),
            "REDIS_DB" => self.redis.db = parse_env(key, value)?,
            "REDIS_PREFIX" => self.redis.prefix = value.to_string(),
            "REDISHEALTHYCONNECTTIMEOUTTHRESHOLD" => {
                self.redis.healthy_connect_timeout_threshold = parse_env_duration(key, value)?
            }
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RedisSection {
    /// Store address, `host:port`.
    #[serde(default = "default_redis_url")]
    pub url: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub db: i64,

    /// Key prefix; keys are `<prefix>.next.<label>`.
    #[serde(default = "default_redis_prefix")]
    pub prefix: String,

    /// Connect timeout of the readiness TCP probe.
    #[serde(
        default = "default_healthy_connect_timeout_threshold",
        deserialize_with = "de_duration"
    )]
    pub healthy_connect_timeout_threshold: Duration,
}

impl Default for RedisSection {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            password: String::new(),
            db: 0,
            prefix: default_redis_prefix(),
            healthy_connect_timeout_threshold: default_healthy_connect_timeout_threshold(),
        }
    }
}

impl RedisSection {
    pub fn validate(&self) -> Result<()> {
        let port_ok = self
            .url
            .rsplit_once(':')
            .map(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok())
            .unwrap_or(false);
        if !port_ok {
            return Err(CounterError::Config(format!(
                "redis.url must be host:port, got {:?}",
                self.url
            )));
        }
        if self.db < 0 {
            return Err(CounterError::Config("redis.db must not be negative".into()));
        }
        if self.prefix.is_empty() {
            return Err(CounterError::Config("redis.prefix must not be empty".into()));
        }
        if self.healthy_connect_timeout_threshold.is_zero() {
            return Err(CounterError::Config(
                "redis.healthy_connect_timeout_threshold must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn default_port() -> u16 {
    80
}
fn default_admin_port() -> u16 {
    9000
}
fn default_graceful_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}
fn default_redis_url() -> String {
    "localhost:6379".into()
}
fn default_redis_prefix() -> String {
    "counter".into()
}
fn default_healthy_connect_timeout_threshold() -> Duration {
    Duration::from_millis(100)
}

fn de_duration<'de, D>(d: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

fn parse_env<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| CounterError::Config(format!("{key}={value:?}: {e}")))
}

fn parse_env_duration(key: &str, value: &str) -> Result<Duration> {
    humantime::parse_duration(value.trim())
        .map_err(|e| CounterError::Config(format!("{key}={value:?}: {e}")))
}
