//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default countdown length and tick cadence
//! - Drag physics tuning
//! - Clock face format
//! - Page swiper geometry
//! - History capacity
//!
//! Configuration is stored at `~/.config/deskclock/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::clock::ClockFormat;
use crate::drag::DragConfig;
use crate::error::ConfigError;
use crate::history::DEFAULT_MAX_RECORDS;
use crate::swiper::SwiperConfig;

/// Countdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_minutes")]
    pub default_minutes: f64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Clock face configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default)]
    pub format: ClockFormat,
}

/// History configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/deskclock/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub swiper: SwiperConfig,
    #[serde(default)]
    pub drag: DragConfig,
}

// Default functions
fn default_minutes() -> f64 {
    25.0
}
fn default_tick_interval_ms() -> u64 {
    100
}
fn default_max_records() -> usize {
    DEFAULT_MAX_RECORDS
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_records: default_max_records(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the default config if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// holds invalid values, or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field's type.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first invalid key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.drag.validate()
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Every leaf key with its current value, in dot-path form.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Drag tuning with the configured values.
    pub fn drag_config(&self) -> DragConfig {
        self.drag.clone()
    }

    pub fn swiper(&self) -> SwiperConfig {
        self.swiper.clone()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::ReleaseTarget;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.default_minutes, 25.0);
        assert_eq!(parsed.drag, DragConfig::default());
        assert_eq!(parsed.swiper, SwiperConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [clock]
            format = "h12"

            [drag]
            friction = 0.9
            "#,
        )
        .unwrap();
        assert_eq!(parsed.clock.format, ClockFormat::H12);
        assert_eq!(parsed.drag.friction, 0.9);
        assert_eq!(parsed.drag.max_velocity, 50.0);
        assert_eq!(parsed.history.max_records, 50);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("clock.format").as_deref(), Some("h24"));
        assert_eq!(cfg.get("drag.elastic_bounds").as_deref(), Some("true"));
        assert_eq!(cfg.get("swiper.pages").as_deref(), Some("3"));
        assert!(cfg.get("drag.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_value_updates_nested_fields() {
        let mut cfg = Config::default();
        cfg.set_value("drag.elastic_bounds", "false").unwrap();
        cfg.set_value("drag.friction", "0.9").unwrap();
        cfg.set_value("timer.default_minutes", "10").unwrap();
        cfg.set_value("drag.release_target", "rest").unwrap();
        cfg.set_value("clock.format", "h12").unwrap();
        assert!(!cfg.drag.elastic_bounds);
        assert_eq!(cfg.drag.friction, 0.9);
        assert_eq!(cfg.timer.default_minutes, 10.0);
        assert_eq!(cfg.drag.release_target, ReleaseTarget::Rest);
        assert_eq!(cfg.clock.format, ClockFormat::H12);
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("drag.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set_value("", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("drag.elastic_bounds", "not_a_bool"),
            Err(ConfigError::InvalidValue { .. })
        ));
        // Strings are validated when deserializing back into the enum.
        assert!(cfg.set_value("clock.format", "h36").is_err());
        assert_eq!(cfg.clock.format, ClockFormat::H24);
    }

    #[test]
    fn set_value_rejects_drag_tuning_that_never_settles() {
        let mut cfg = Config::default();
        for (key, value) in [
            ("drag.max_velocity", "-5"),
            ("drag.velocity_threshold", "0"),
            ("drag.friction", "1"),
            ("drag.spring_damping", "1.2"),
            ("drag.spring_stiffness", "0"),
        ] {
            match cfg.set_value(key, value) {
                Err(ConfigError::InvalidValue { key: reported, .. }) => assert_eq!(reported, key),
                other => panic!("{key} = {value} should be rejected, got {other:?}"),
            }
        }
        assert_eq!(cfg.drag, DragConfig::default());
        cfg.set_value("drag.max_velocity", "0").unwrap();
        assert_eq!(cfg.drag.max_velocity, 0.0);
    }

    #[test]
    fn load_from_rejects_invalid_drag_tuning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[drag]\nvelocity_threshold = 0.0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn entries_lists_leaf_keys() {
        let entries = Config::default().entries();
        assert!(entries
            .iter()
            .any(|(k, v)| k == "timer.tick_interval_ms" && v == "100"));
        assert!(entries.iter().any(|(k, _)| k == "drag.rest.x"));
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.history.max_records, 50);

        let mut changed = cfg.clone();
        changed.set_value("history.max_records", "10").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().history.max_records, 10);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
