use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::CoachError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachConfig {
    #[serde(default)]
    pub detection: DetectionConfig,

    #[serde(default)]
    pub plan_api: PlanApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,

    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,

    #[serde(default = "default_camera_width")]
    pub camera_width: u32,

    #[serde(default = "default_camera_height")]
    pub camera_height: u32,

    #[serde(default)]
    pub facing_mode: FacingMode,
}

/// Preferred camera orientation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front-facing camera
    #[default]
    User,
    Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Overrides the default cache location (~/.form-coach/cache)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_sample_interval_ms() -> u64 {
    500
}

fn default_min_confidence() -> f32 {
    crate::models::DEFAULT_MIN_CONFIDENCE
}

fn default_smoothing_window() -> usize {
    crate::services::smoothing::DEFAULT_WINDOW
}

fn default_camera_width() -> u32 {
    640
}

fn default_camera_height() -> u32 {
    480
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: default_sample_interval_ms(),
            min_confidence: default_min_confidence(),
            smoothing_window: default_smoothing_window(),
            camera_width: default_camera_width(),
            camera_height: default_camera_height(),
            facing_mode: FacingMode::default(),
        }
    }
}

impl DetectionConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }
}

impl Default for PlanApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl CoachConfig {
    /// Get config directory path (~/.form-coach/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".form-coach"))
    }

    /// Get config file path (~/.form-coach/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, then apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_file()?)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).context("Failed to read config file")?;
        let config: CoachConfig = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    /// Apply FORM_COACH_* environment variables on top of the file values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = env::var("FORM_COACH_PLAN_API_URL") {
            self.plan_api.base_url = url;
        }
        if let Ok(level) = env::var("FORM_COACH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(path) = env::var("FORM_COACH_CACHE_PATH") {
            self.storage.cache_path = Some(PathBuf::from(path));
        }
        if let Ok(interval) = env::var("FORM_COACH_SAMPLE_INTERVAL_MS") {
            self.detection.sample_interval_ms = interval
                .parse()
                .context("FORM_COACH_SAMPLE_INTERVAL_MS must be an integer")?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CoachError> {
        let detection = &self.detection;
        if detection.sample_interval_ms == 0 {
            return Err(CoachError::InvalidConfig(
                "sample_interval_ms must be greater than zero".to_string(),
            ));
        }
        if detection.smoothing_window == 0 {
            return Err(CoachError::InvalidConfig(
                "smoothing_window must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&detection.min_confidence) {
            return Err(CoachError::InvalidConfig(format!(
                "min_confidence {} is outside [0, 1]",
                detection.min_confidence
            )));
        }
        Ok(())
    }

    /// Resolve the plan cache location
    pub fn cache_path(&self) -> Result<PathBuf> {
        match &self.storage.cache_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("cache")),
        }
    }
}
