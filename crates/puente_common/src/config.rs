//! Configuration for the bridge.
//!
//! File: `puente.toml`, absent sections fall back to defaults. The device
//! section additionally honors the `ARDUINO_PORT` / `ARDUINO_BAUDRATE`
//! environment overrides, which win over file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Serial device the bridge talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Device node of the serial port, e.g. `/dev/ttyACM0` or `COM3`.
    pub port: Option<String>,
    pub baudrate: Option<u32>,
}

impl DeviceConfig {
    /// Apply environment overrides on top of file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(port) = std::env::var("ARDUINO_PORT") {
            if !port.is_empty() {
                self.port = Some(port);
            }
        }
        if let Ok(baud) = std::env::var("ARDUINO_BAUDRATE") {
            if let Ok(baud) = baud.parse() {
                self.baudrate = Some(baud);
            }
        }
        self
    }
}

/// Log sink locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Base directory; the device error log lives at
    /// `<base_dir>/logs/arduino_errors.log`.
    pub base_dir: PathBuf,
    /// General-purpose log receiving one line per suppressed event.
    pub general: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            general: PathBuf::from("logs/puente.log"),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // Localhost only; the bridge sits behind the web frontend.
            bind: "127.0.0.1:7642".to_string(),
        }
    }
}

/// Error presenter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenterConfig {
    /// Template the HTML presenter renders error pages from.
    pub template: PathBuf,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            template: PathBuf::from("templates/error.html"),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuenteConfig {
    pub device: DeviceConfig,
    pub log: LogConfig,
    pub server: ServerConfig,
    pub presenter: PresenterConfig,
}

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    device: RawDeviceConfig,
    #[serde(default)]
    log: RawLogConfig,
    #[serde(default)]
    server: RawServerConfig,
    #[serde(default)]
    presenter: RawPresenterConfig,
}

#[derive(Debug, Deserialize, Default)]
struct RawDeviceConfig {
    #[serde(default)]
    port: Option<String>,
    #[serde(default)]
    baudrate: Option<u32>,
}

impl From<RawDeviceConfig> for DeviceConfig {
    fn from(raw: RawDeviceConfig) -> Self {
        Self {
            port: raw.port,
            baudrate: raw.baudrate,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawLogConfig {
    #[serde(default)]
    dir: Option<PathBuf>,
    #[serde(default)]
    general: Option<PathBuf>,
}

impl From<RawLogConfig> for LogConfig {
    fn from(raw: RawLogConfig) -> Self {
        let defaults = LogConfig::default();
        Self {
            base_dir: raw.dir.unwrap_or(defaults.base_dir),
            general: raw.general.unwrap_or(defaults.general),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawServerConfig {
    #[serde(default)]
    bind: Option<String>,
}

impl From<RawServerConfig> for ServerConfig {
    fn from(raw: RawServerConfig) -> Self {
        let defaults = ServerConfig::default();
        Self {
            bind: raw.bind.unwrap_or(defaults.bind),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawPresenterConfig {
    #[serde(default)]
    template: Option<PathBuf>,
}

impl From<RawPresenterConfig> for PresenterConfig {
    fn from(raw: RawPresenterConfig) -> Self {
        let defaults = PresenterConfig::default();
        Self {
            template: raw.template.unwrap_or(defaults.template),
        }
    }
}

impl PuenteConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    /// Device environment overrides are applied last.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            toml::from_str::<RawConfig>(&contents)
                .with_context(|| format!("parse {}", path.display()))?
        } else {
            RawConfig::default()
        };

        Ok(Self {
            device: DeviceConfig::from(raw.device).with_env_overrides(),
            log: raw.log.into(),
            server: raw.server.into(),
            presenter: raw.presenter.into(),
        })
    }
}
