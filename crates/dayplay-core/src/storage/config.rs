//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Opponent pacing and naming for the game
//! - Default title for new timetables
//! - Log level
//!
//! Configuration is stored at `~/.config/dayplay/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Game-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Pause before the computer answers a human move.
    #[serde(default = "default_opponent_delay_ms")]
    pub opponent_delay_ms: u64,
    /// Display name credited with computer wins.
    #[serde(default = "default_opponent_name")]
    pub opponent_name: String,
    /// Fixed seed for the opponent's random fallback (None = entropy).
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Planner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Suggested title for a new timetable, suffixed with its ordinal.
    #[serde(default = "default_title_prefix")]
    pub default_title_prefix: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayplay/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_opponent_delay_ms() -> u64 {
    500
}
fn default_opponent_name() -> String {
    "Computer".into()
}
fn default_title_prefix() -> String {
    "Timetable".into()
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            opponent_delay_ms: default_opponent_delay_ms(),
            opponent_name: default_opponent_name(),
            seed: None,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_title_prefix: default_title_prefix(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
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
                    // Optional numeric fields serialize as null while unset;
                    // a non-optional field rejects null when deserialized back.
                    serde_json::Value::Number(_) | serde_json::Value::Null => {
                        if value.eq_ignore_ascii_case("none") || value.is_empty() {
                            serde_json::Value::Null
                        } else {
                            value
                                .parse::<u64>()
                                .map(|n| serde_json::Value::Number(n.into()))
                                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
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
        let path = Self::path()?;
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.clone(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| save_failed(e.to_string()))?;
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

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Set a config value by key and persist. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.game.opponent_delay_ms, 500);
        assert_eq!(parsed.game.opponent_name, "Computer");
        assert_eq!(parsed.planner.default_title_prefix, "Timetable");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("[game]\nopponent_delay_ms = 0\n").unwrap();
        assert_eq!(parsed.game.opponent_delay_ms, 0);
        assert_eq!(parsed.game.opponent_name, "Computer");
        assert_eq!(parsed.log.level, "warn");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("game.opponent_delay_ms").as_deref(), Some("500"));
        assert_eq!(cfg.get("log.level").as_deref(), Some("warn"));
        assert_eq!(cfg.get("game.seed").as_deref(), Some("null"));
        assert!(cfg.get("game.missing_key").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("game.opponent_delay_ms", "0").unwrap();
        cfg.apply("game.opponent_name", "HAL").unwrap();
        cfg.apply("game.seed", "42").unwrap();
        assert_eq!(cfg.game.opponent_delay_ms, 0);
        assert_eq!(cfg.game.opponent_name, "HAL");
        assert_eq!(cfg.game.seed, Some(42));

        cfg.apply("game.seed", "none").unwrap();
        assert_eq!(cfg.game.seed, None);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.apply("game.nonexistent", "1").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn apply_rejects_invalid_number() {
        let mut cfg = Config::default();
        let err = cfg.apply("game.opponent_delay_ms", "soon").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.game.opponent_delay_ms, 500);
    }
}
