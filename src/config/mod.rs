//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Source workbook configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the Excel workbook holding results and roster
    #[serde(default = "default_workbook")]
    pub workbook: PathBuf,

    /// Sheet name for match results (matched case-insensitively)
    #[serde(default = "default_results_sheet")]
    pub results_sheet: String,

    /// Sheet name for the player roster
    #[serde(default = "default_players_sheet")]
    pub players_sheet: String,

    /// How long a workbook read stays cached before re-reading
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
}

fn default_workbook() -> PathBuf {
    PathBuf::from("./data/results.xlsx")
}

fn default_results_sheet() -> String {
    "results".to_string()
}

fn default_players_sheet() -> String {
    "players".to_string()
}

fn default_cache_ttl() -> u64 {
    5
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            workbook: default_workbook(),
            results_sheet: default_results_sheet(),
            players_sheet: default_players_sheet(),
            cache_ttl_seconds: default_cache_ttl(),
        }
    }
}

/// Image asset directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Player picture directory, filenames come from the roster
    #[serde(default = "default_player_pics")]
    pub player_pics: PathBuf,

    /// Character icon directory, `<character>.png` per character
    #[serde(default = "default_character_pics")]
    pub character_pics: PathBuf,

    /// Page background image; skipped when the file is absent
    #[serde(default = "default_background")]
    pub background: PathBuf,

    /// Crown overlay for the rank-1 card
    #[serde(default = "default_crown")]
    pub crown: PathBuf,
}

fn default_player_pics() -> PathBuf {
    PathBuf::from("./player_pics")
}

fn default_character_pics() -> PathBuf {
    PathBuf::from("./character_pics")
}

fn default_background() -> PathBuf {
    PathBuf::from("./assets/mario_bg.jpg")
}

fn default_crown() -> PathBuf {
    PathBuf::from("./assets/crown.png")
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            player_pics: default_player_pics(),
            character_pics: default_character_pics(),
            background: default_background(),
            crown: default_crown(),
        }
    }
}

/// Dashboard page configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Page title shown in the header and browser tab
    #[serde(default = "default_title")]
    pub title: String,

    /// Browser auto-reload interval
    #[serde(default = "default_refresh")]
    pub refresh_seconds: u64,
}

fn default_title() -> String {
    "Tournament Leaderboard".to_string()
}

fn default_refresh() -> u64 {
    5
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            refresh_seconds: default_refresh(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data: DataConfig::default(),
            assets: AssetsConfig::default(),
            dashboard: DashboardConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.refresh_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Refresh interval must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
