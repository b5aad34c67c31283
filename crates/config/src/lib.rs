//! Robot configuration models and loaders for rover mission control.

pub mod registry;

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use registry::ConfigRegistry;

/// Physical parameters of the robot the trajectory is generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotConfig {
    /// Chassis length (feet).
    pub length: f64,
    /// Chassis width (feet).
    pub width: f64,
    /// Top speed along the path (ft/s).
    #[serde(alias = "max_speed")]
    pub max_speed: f64,
    /// Acceleration and braking limit (ft/s²).
    #[serde(alias = "max_accel")]
    pub max_accel: f64,
    /// Network endpoint of the robot. Deployment metadata only.
    #[serde(default)]
    pub address: String,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            length: 2.0,
            width: 2.0,
            max_speed: 3.0,
            max_accel: 2.0,
            address: String::new(),
        }
    }
}

impl RobotConfig {
    /// Reject non-finite or non-positive physical parameters.
    pub fn validate(&self) -> Result<(), ParameterError> {
        positive("length", self.length)?;
        positive("width", self.width)?;
        positive("maxSpeed", self.max_speed)?;
        positive("maxAccel", self.max_accel)?;
        Ok(())
    }
}

/// A physical parameter outside its admissible range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("{name} must be a finite number, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("{name} must be greater than zero, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

fn positive(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if !value.is_finite() {
        return Err(ParameterError::NotFinite { name, value });
    }
    if value <= 0.0 {
        return Err(ParameterError::NonPositive { name, value });
    }
    Ok(())
}

/// Service-level settings: where missions live, how finely to sample, and the initial robot.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    #[serde(default = "default_sample_period")]
    pub sample_period_s: f64,
    #[serde(default)]
    pub robot: RobotConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            sample_period_s: default_sample_period(),
            robot: RobotConfig::default(),
        }
    }
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("missions")
}

fn default_sample_period() -> f64 {
    0.05
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid parameter: {0}")]
    Parameter(#[from] ParameterError),
}

/// Load and validate a robot configuration from a YAML or TOML file.
pub fn load_robot_config<P: AsRef<Path>>(path: P) -> Result<RobotConfig, ConfigError> {
    let config: RobotConfig = load_record(path.as_ref())?;
    config.validate()?;
    Ok(config)
}

/// Load service settings from a TOML file, validating the embedded robot parameters.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let settings: Settings = toml::from_str(&contents)?;
    positive("sample_period_s", settings.sample_period_s)?;
    settings.robot.validate()?;
    tracing::debug!(
        store_dir = %settings.store_dir.display(),
        sample_period_s = settings.sample_period_s,
        "loaded settings"
    );
    Ok(settings)
}

fn load_record<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}
