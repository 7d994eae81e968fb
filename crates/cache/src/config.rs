//! Cache configuration with a fluent builder, validation and layered loading

use crate::errors::{CacheError, RecoveryHint, Result};
use crate::eviction::EvictionPolicyKind;
use crate::storage::CompressionKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "DISKCACHE_";

/// Resolved cache configuration
///
/// A zero polling period disables the matching background controller; the
/// work can still be triggered by hand through [`crate::Cache`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheOptions {
    /// Directory holding one file per key
    pub root: PathBuf,
    pub compression: CompressionKind,
    /// Cache-wide TTL for entries set with [`crate::Ttl::Default`]; `None` never expires
    pub default_ttl: Option<Duration>,
    pub eviction_policy: EvictionPolicyKind,
    /// Ceiling on volume usage in percent, 0 disables
    pub max_usage_percent: f64,
    /// Floor on free bytes, 0 disables
    pub min_free_space: u64,
    pub check_orphans_period: Duration,
    pub check_evictions_period: Duration,
    pub check_ttl_period: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/diskcache"),
            compression: CompressionKind::Gzip,
            default_ttl: Some(Duration::from_secs(60 * 60)),
            eviction_policy: EvictionPolicyKind::OldestFirst,
            max_usage_percent: 90.0,
            min_free_space: 0,
            check_orphans_period: Duration::from_secs(60),
            check_evictions_period: Duration::from_secs(60),
            check_ttl_period: Duration::from_secs(1),
        }
    }
}

impl CacheOptions {
    /// Defaults rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::default().with_root(root)
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_compression(mut self, compression: CompressionKind) -> Self {
        self.compression = compression;
        self
    }

    /// `None` disables expiry for entries using the default TTL
    pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_eviction_policy(mut self, policy: EvictionPolicyKind) -> Self {
        self.eviction_policy = policy;
        self
    }

    pub fn with_max_usage_percent(mut self, percent: f64) -> Self {
        self.max_usage_percent = percent;
        self
    }

    pub fn with_min_free_space(mut self, bytes: u64) -> Self {
        self.min_free_space = bytes;
        self
    }

    pub fn with_check_orphans_period(mut self, period: Duration) -> Self {
        self.check_orphans_period = period;
        self
    }

    pub fn with_check_evictions_period(mut self, period: Duration) -> Self {
        self.check_evictions_period = period;
        self
    }

    pub fn with_check_ttl_period(mut self, period: Duration) -> Self {
        self.check_ttl_period = period;
        self
    }

    /// Whether disk-pressure eviction has a threshold and a policy to act on
    pub fn eviction_enabled(&self) -> bool {
        (self.min_free_space > 0 || self.max_usage_percent > 0.0)
            && self.eviction_policy != EvictionPolicyKind::None
    }

    /// Reject configurations that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(CacheError::configuration(
                "cache root directory must be set",
            ));
        }

        if !self.max_usage_percent.is_finite()
            || !(0.0..=100.0).contains(&self.max_usage_percent)
        {
            return Err(CacheError::Configuration {
                message: format!(
                    "max usage percent must be between 0 and 100, got {}",
                    self.max_usage_percent
                ),
                recovery_hint: RecoveryHint::UseDefault {
                    value: "90".to_string(),
                },
            });
        }

        if self.default_ttl == Some(Duration::ZERO) {
            return Err(CacheError::Configuration {
                message: "default TTL must be positive; use no expiration instead of zero"
                    .to_string(),
                recovery_hint: RecoveryHint::UpdateConfiguration,
            });
        }

        Ok(())
    }
}

/// Loads [`CacheOptions`] from defaults, an optional JSON file and the environment
///
/// Later sources override earlier ones.
pub struct CacheOptionsLoader;

impl CacheOptionsLoader {
    /// Load with full precedence handling
    pub fn load(config_file: Option<&Path>) -> Result<CacheOptions> {
        let mut options = CacheOptions::default();

        if let Some(path) = config_file {
            if path.exists() {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| CacheError::io(path.into(), "read config file", e))?;
                options = Self::merge_json(options, &content)?;
                tracing::debug!(path = %path.display(), "Loaded cache configuration file");
            }
        }

        options = Self::merge_env(options, std::env::vars())?;
        options.validate()?;
        Ok(options)
    }

    /// Apply fields present in a JSON document; absent fields keep their value
    pub fn merge_json(mut options: CacheOptions, content: &str) -> Result<CacheOptions> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let Some(object) = value.as_object() else {
            return Err(CacheError::configuration(
                "configuration file must be a JSON object",
            ));
        };

        for (field, value) in object {
            match field.as_str() {
                "root" => options.root = PathBuf::from(json_str(field, value)?),
                "compression" => options.compression = json_str(field, value)?.parse()?,
                "default_ttl_secs" => {
                    options.default_ttl = match value {
                        serde_json::Value::Null => None,
                        _ => Some(Duration::from_secs(json_u64(field, value)?)),
                    }
                }
                "eviction_policy" => options.eviction_policy = json_str(field, value)?.parse()?,
                "max_usage_percent" => options.max_usage_percent = json_f64(field, value)?,
                "min_free_space" => options.min_free_space = json_u64(field, value)?,
                "check_orphans_period_ms" => {
                    options.check_orphans_period = json_millis(field, value)?;
                }
                "check_evictions_period_ms" => {
                    options.check_evictions_period = json_millis(field, value)?;
                }
                "check_ttl_period_ms" => options.check_ttl_period = json_millis(field, value)?,
                other => {
                    tracing::warn!(field = other, "Ignoring unknown cache configuration field");
                }
            }
        }

        Ok(options)
    }

    /// Apply `DISKCACHE_*` variables from `vars`
    pub fn merge_env<I>(mut options: CacheOptions, vars: I) -> Result<CacheOptions>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(field) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            match field {
                "ROOT" => options.root = PathBuf::from(value),
                "COMPRESSION" => options.compression = value.parse()?,
                "DEFAULT_TTL_SECS" => {
                    options.default_ttl = if value.eq_ignore_ascii_case("never") {
                        None
                    } else {
                        Some(Duration::from_secs(env_number(&name, &value)?))
                    }
                }
                "EVICTION_POLICY" => options.eviction_policy = value.parse()?,
                "MAX_USAGE_PERCENT" => options.max_usage_percent = env_number(&name, &value)?,
                "MIN_FREE_SPACE" => options.min_free_space = env_number(&name, &value)?,
                "CHECK_ORPHANS_PERIOD_MS" => {
                    options.check_orphans_period = env_millis(&name, &value)?;
                }
                "CHECK_EVICTIONS_PERIOD_MS" => {
                    options.check_evictions_period = env_millis(&name, &value)?;
                }
                "CHECK_TTL_PERIOD_MS" => options.check_ttl_period = env_millis(&name, &value)?,
                _ => {}
            }
        }

        Ok(options)
    }
}

fn type_error(field: &str) -> CacheError {
    CacheError::configuration(format!("configuration field '{field}' has the wrong type"))
}

fn json_str<'a>(field: &str, value: &'a serde_json::Value) -> Result<&'a str> {
    value.as_str().ok_or_else(|| type_error(field))
}

fn json_u64(field: &str, value: &serde_json::Value) -> Result<u64> {
    value.as_u64().ok_or_else(|| type_error(field))
}

fn json_f64(field: &str, value: &serde_json::Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| type_error(field))
}

fn json_millis(field: &str, value: &serde_json::Value) -> Result<Duration> {
    json_u64(field, value).map(Duration::from_millis)
}

fn env_number<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        let message = format!("{name} must be a non-negative number, got '{value}'");
        CacheError::configuration(message)
    })
}

fn env_millis(name: &str, value: &str) -> Result<Duration> {
    env_number(name, value).map(Duration::from_millis)
}
