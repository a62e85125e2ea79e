//! Diagnostic context attached to device error records.

use crate::config::DeviceConfig;
use serde::{Deserialize, Serialize};

/// Sentinel for device settings that were never configured.
pub const NOT_CONFIGURED: &str = "No configurado";

/// Sentinel for an unknown server identity.
pub const UNKNOWN_SERVER: &str = "Unknown";

/// Snapshot of the process environment recorded with each device error.
///
/// Built fresh per logged event and never persisted beyond the log line.
/// Field names keep the legacy record schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticContext {
    #[serde(rename = "OS")]
    pub os: String,
    #[serde(rename = "RUNTIME_VERSION")]
    pub runtime_version: String,
    #[serde(rename = "USER")]
    pub user: Option<String>,
    #[serde(rename = "SERVER_SOFTWARE")]
    pub server_software: String,
    #[serde(rename = "CURRENT_PORT")]
    pub current_port: String,
    #[serde(rename = "ARDUINO_BAUDRATE")]
    pub baudrate: String,
}

impl DiagnosticContext {
    /// Collect from the process environment and device configuration.
    pub fn collect(device: &DeviceConfig) -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            runtime_version: env!("CARGO_PKG_VERSION").to_string(),
            user: std::env::var("USERNAME")
                .or_else(|_| std::env::var("USER"))
                .ok(),
            server_software: std::env::var("SERVER_SOFTWARE")
                .unwrap_or_else(|_| UNKNOWN_SERVER.to_string()),
            current_port: device
                .port
                .clone()
                .unwrap_or_else(|| NOT_CONFIGURED.to_string()),
            baudrate: device
                .baudrate
                .map(|b| b.to_string())
                .unwrap_or_else(|| NOT_CONFIGURED.to_string()),
        }
    }

    /// Single-line JSON for the log record. serde_json leaves forward
    /// slashes unescaped, which the record format requires.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
