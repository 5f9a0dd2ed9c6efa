use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the initial board comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    /// JSON seed file. When unset the built-in seed is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    /// Drawer width as a share of the terminal width.
    #[serde(default = "default_drawer_width")]
    pub drawer_width_percent: u16,
    #[serde(default = "default_true")]
    pub show_keys_bar: bool,
    #[serde(default = "default_true")]
    pub mouse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
            drawer_width_percent: default_drawer_width(),
            show_keys_bar: true,
            mouse: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl UiConfig {
    pub fn drawer_width(&self) -> u16 {
        self.drawer_width_percent.clamp(20, 90)
    }
}

fn default_tick_rate_ms() -> u64 {
    100
}

fn default_drawer_width() -> u16 {
    40
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.seed.path.is_none());
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert_eq!(config.ui.drawer_width(), 40);
        assert!(config.ui.show_keys_bar);
        assert_eq!(config.logging.filter, "info");
        assert!(Config::config_path().ends_with("dashboard/config.toml"));
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            [seed]
            path = "/srv/board.json"

            [ui]
            drawer_width_percent = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.seed.path, Some(PathBuf::from("/srv/board.json")));
        assert_eq!(config.ui.drawer_width(), 20);
        assert_eq!(config.ui.tick_rate_ms, 100);
        assert!(config.ui.mouse);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_round_trip_default() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back = Config::parse(&text).unwrap();
        assert_eq!(back.ui.drawer_width_percent, 40);
    }
}
