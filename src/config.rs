use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::scheduler::QueueOptions;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub randomize_order: bool,
    #[serde(default)]
    pub prioritize_failed: bool,
    #[serde(default)]
    pub prioritize_slow: bool,
    #[serde(default)]
    pub random_auf: bool,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_tick_rate_ms() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            randomize_order: false,
            prioritize_failed: false,
            prioritize_slow: false,
            random_auf: false,
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cubedex")
            .join("config.toml")
    }

    /// Random order and slow-first ordering contradict each other, so
    /// turning one on turns the other off.
    pub fn toggle_randomize_order(&mut self) {
        self.randomize_order = !self.randomize_order;
        if self.randomize_order {
            self.prioritize_slow = false;
        }
    }

    pub fn toggle_prioritize_slow(&mut self) {
        self.prioritize_slow = !self.prioritize_slow;
        if self.prioritize_slow {
            self.randomize_order = false;
        }
    }

    pub fn toggle_prioritize_failed(&mut self) {
        self.prioritize_failed = !self.prioritize_failed;
    }

    pub fn toggle_random_auf(&mut self) {
        self.random_auf = !self.random_auf;
    }

    pub fn queue_options(&self) -> QueueOptions {
        QueueOptions {
            randomize_order: self.randomize_order,
            prioritize_failed: self.prioritize_failed,
            prioritize_slow: self.prioritize_slow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.tick_rate_ms, 30);
        assert!(!config.randomize_order);
        assert!(!config.random_auf);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let config: Config = toml::from_str("theme = \"nord\"\nrandom_auf = true\n").unwrap();
        assert_eq!(config.theme, "nord");
        assert!(config.random_auf);
        assert_eq!(config.tick_rate_ms, 30);
    }

    #[test]
    fn serde_roundtrip() {
        let mut config = Config::default();
        config.toggle_prioritize_slow();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert!(deserialized.prioritize_slow);
        assert_eq!(config.theme, deserialized.theme);
    }

    #[test]
    fn ordering_toggles_are_mutually_exclusive() {
        let mut config = Config::default();
        config.toggle_prioritize_slow();
        assert!(config.prioritize_slow);
        config.toggle_randomize_order();
        assert!(config.randomize_order);
        assert!(!config.prioritize_slow);
        config.toggle_prioritize_slow();
        assert!(config.prioritize_slow);
        assert!(!config.randomize_order);
    }
}
