//! Configuration module for the accessory
//!
//! Reads accessory settings from ~/.config/sensehat-bridge/config.toml

use crate::linux::iio::DEFAULT_IIO_PATH;
use crate::sensors::cputemp::DEFAULT_CPUTEMP_PATH;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_NAME: &str = "SenseHat";
pub const DEFAULT_SENSORS_INTERVAL_SECS: f64 = 10.0;
pub const DEFAULT_LED_INTERVAL_SECS: f64 = 2.0;

/// Accessory configuration
///
/// Every field is optional. Empty strings and zero intervals count as unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Base display name for all services
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_temperature: Option<String>,
    #[serde(default)]
    pub name_humidity: Option<String>,
    #[serde(default)]
    pub name_pressure: Option<String>,
    /// File holding the CPU temperature in millidegrees
    #[serde(default)]
    pub cputemp_path: Option<PathBuf>,
    /// Seconds. Reserved: no LED refresh timer is scheduled.
    #[serde(default)]
    pub led_interval: Option<f64>,
    /// Seconds between sensor reads
    #[serde(default)]
    pub sensors_interval: Option<f64>,
    /// Root scanned for IIO sensor devices
    #[serde(default)]
    pub iio_path: Option<PathBuf>,
    /// LED framebuffer device; auto-detected when unset
    #[serde(default)]
    pub framebuffer: Option<PathBuf>,
}

impl Config {
    /// Get the default config file path
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sensehat-bridge").join("config.toml"))
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            tracing::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::error!("Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    pub fn display_name(&self) -> &str {
        non_empty(&self.name).unwrap_or(DEFAULT_NAME)
    }

    pub fn temperature_name(&self) -> &str {
        non_empty(&self.name_temperature).unwrap_or_else(|| self.display_name())
    }

    pub fn humidity_name(&self) -> &str {
        non_empty(&self.name_humidity).unwrap_or_else(|| self.display_name())
    }

    pub fn pressure_name(&self) -> &str {
        non_empty(&self.name_pressure).unwrap_or_else(|| self.display_name())
    }

    pub fn cputemp_path(&self) -> PathBuf {
        non_empty_path(&self.cputemp_path).unwrap_or_else(|| PathBuf::from(DEFAULT_CPUTEMP_PATH))
    }

    pub fn sensors_interval(&self) -> Duration {
        seconds(self.sensors_interval, DEFAULT_SENSORS_INTERVAL_SECS)
    }

    pub fn led_interval(&self) -> Duration {
        seconds(self.led_interval, DEFAULT_LED_INTERVAL_SECS)
    }

    pub fn iio_path(&self) -> PathBuf {
        non_empty_path(&self.iio_path).unwrap_or_else(|| PathBuf::from(DEFAULT_IIO_PATH))
    }

    pub fn framebuffer(&self) -> Option<PathBuf> {
        non_empty_path(&self.framebuffer)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn non_empty_path(value: &Option<PathBuf>) -> Option<PathBuf> {
    value
        .as_ref()
        .filter(|p| !p.as_os_str().is_empty())
        .cloned()
}

fn seconds(value: Option<f64>, default: f64) -> Duration {
    value
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .filter(|d| !d.is_zero())
        .unwrap_or_else(|| Duration::from_secs_f64(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::scratch_dir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.display_name(), DEFAULT_NAME);
        assert_eq!(config.cputemp_path(), PathBuf::from("/sys/class/thermal/thermal_zone0/temp"));
        assert_eq!(config.sensors_interval(), Duration::from_millis(10_000));
        assert_eq!(config.led_interval(), Duration::from_millis(2_000));
        assert_eq!(config.iio_path(), PathBuf::from("/sys/bus/iio/devices"));
        assert_eq!(config.framebuffer(), None);
    }

    #[test]
    fn test_names_fall_back_to_base_name() {
        let config: Config = toml::from_str(
            r#"
            name = "Hat"
            name_humidity = "Bathroom"
            name_pressure = ""
            "#,
        )
        .unwrap();

        assert_eq!(config.display_name(), "Hat");
        assert_eq!(config.temperature_name(), "Hat");
        assert_eq!(config.humidity_name(), "Bathroom");
        assert_eq!(config.pressure_name(), "Hat");
    }

    #[test]
    fn test_intervals_in_seconds() {
        let config: Config = toml::from_str("sensors_interval = 30\nled_interval = 0.5").unwrap();
        assert_eq!(config.sensors_interval(), Duration::from_secs(30));
        assert_eq!(config.led_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_zero_and_negative_intervals_use_defaults() {
        let config: Config = toml::from_str("sensors_interval = 0\nled_interval = -4").unwrap();
        assert_eq!(config.sensors_interval(), Duration::from_secs(10));
        assert_eq!(config.led_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_sub_nanosecond_interval_uses_default() {
        let config: Config = toml::from_str("sensors_interval = 1e-12\nled_interval = 1e-10").unwrap();
        assert_eq!(config.sensors_interval(), Duration::from_secs(10));
        assert_eq!(config.led_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_empty_paths_use_defaults() {
        let config: Config = toml::from_str("cputemp_path = \"\"\nframebuffer = \"\"").unwrap();
        assert_eq!(config.cputemp_path(), PathBuf::from(DEFAULT_CPUTEMP_PATH));
        assert_eq!(config.framebuffer(), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = scratch_dir("config");
        let path = dir.join("config.toml");
        fs::write(&path, "name = \"Hat\"\ncputemp_path = \"/tmp/cpu\"\nframebuffer = \"/dev/fb1\"").unwrap();

        let config = Config::load_from(&path);
        assert_eq!(config.display_name(), "Hat");
        assert_eq!(config.cputemp_path(), PathBuf::from("/tmp/cpu"));
        assert_eq!(config.framebuffer(), Some(PathBuf::from("/dev/fb1")));
    }

    #[test]
    fn test_load_missing_or_broken_file_gives_defaults() {
        let dir = scratch_dir("config");
        assert_eq!(Config::load_from(&dir.join("absent.toml")).display_name(), DEFAULT_NAME);

        let broken = dir.join("broken.toml");
        fs::write(&broken, "name = [").unwrap();
        assert_eq!(Config::load_from(&broken).display_name(), DEFAULT_NAME);
    }

    #[test]
    fn test_bundled_example_parses() {
        let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();
        assert_eq!(config.display_name(), "SenseHat");
        assert_eq!(config.sensors_interval(), Duration::from_secs(10));
    }
}
