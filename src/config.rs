//! Dashboard configuration
//!
//! Loaded from an optional JSON file; every field has a default so an empty
//! object `{}` is a valid config. CLI flags are applied on top by `main`.
//!
//! ```json
//! {
//!     "title": "Nutrint Dashboard",
//!     "target": 1500,
//!     "count_column": "hh_num",
//!     "media": "video"
//! }
//! ```

use crate::presenter::{PresenterError, Region, ThresholdPresenter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_TARGET: i64 = 1500;
pub const DEFAULT_PORT: u16 = 8050;

/// Celebration media shown behind the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Media {
    /// Animated fireworks image as the overlay background
    #[default]
    Image,
    /// Autoplaying fireworks video inside the overlay
    Video,
    /// Plain dimmed overlay
    None,
}

impl std::str::FromStr for Media {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(Media::Image),
            "video" => Ok(Media::Video),
            "none" => Ok(Media::None),
            other => Err(format!("unknown media '{}' (expected image, video or none)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub gauge_title: String,
    pub count_column: String,
    pub target: i64,
    pub bar_color: String,
    pub celebration_message: String,
    pub media: Media,
    pub image_file: String,
    pub video_file: String,
    /// Logo files under `assets_dir`, left to right. Empty means discover.
    pub logos: Vec<String>,
    pub assets_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Survey Dashboard".to_string(),
            gauge_title: "Total Number of Household Contacted and had Completed Interviews"
                .to_string(),
            count_column: "hh_num".to_string(),
            target: DEFAULT_TARGET,
            bar_color: "#FF4500".to_string(),
            celebration_message: "Congratulations! You have reached your target sample size!"
                .to_string(),
            media: Media::Image,
            image_file: "fireworks.gif".to_string(),
            video_file: "fireworks.mp4".to_string(),
            logos: Vec::new(),
            assets_dir: PathBuf::from("assets"),
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Error type for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Cannot read config: {}", e),
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<PresenterError> for ConfigError {
    fn from(e: PresenterError) -> Self {
        ConfigError::Invalid(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl DashboardConfig {
    /// Read a JSON config file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target <= 0 {
            return Err(ConfigError::Invalid(format!(
                "target must be positive, got {}",
                self.target
            )));
        }
        if self.count_column.is_empty() {
            return Err(ConfigError::Invalid("count_column must not be empty".to_string()));
        }
        if !is_hex_color(&self.bar_color) {
            return Err(ConfigError::Invalid(format!(
                "bar_color must be #rgb or #rrggbb, got '{}'",
                self.bar_color
            )));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must not be 0".to_string()));
        }
        Ok(())
    }

    /// Regions the page renders for the configured media
    pub fn regions(&self) -> Vec<Region> {
        match self.media {
            Media::Video => vec![Region::Overlay, Region::Text, Region::Video],
            Media::Image | Media::None => vec![Region::Overlay, Region::Text],
        }
    }

    pub fn presenter(&self) -> Result<ThresholdPresenter> {
        Ok(ThresholdPresenter::new(self.target)?.with_regions(&self.regions()))
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
