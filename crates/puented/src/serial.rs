//! Serial device access.
//!
//! The bridge reaches the Arduino through the port's device node. Open
//! failures become runtime error events carrying the legacy fopen-style
//! message, so the interceptor files them under the device subsystem.
//! No line discipline is configured here; the probe only answers whether
//! the node can be opened at all.

use puente_common::{DeviceConfig, ErrorEvent, ErrorLevel};
use std::fs::OpenOptions;

/// Try to open the configured port read/write.
pub fn probe_port(device: &DeviceConfig) -> Result<(), ErrorEvent> {
    let port = match &device.port {
        Some(port) => port,
        None => {
            return Err(ErrorEvent::new(
                ErrorLevel::Warning,
                "puerto serial no configurado",
                file!(),
                line!(),
            ));
        }
    };

    match OpenOptions::new().read(true).write(true).open(port) {
        Ok(_) => Ok(()),
        Err(e) => Err(ErrorEvent::new(
            ErrorLevel::Warning,
            format!("fopen({}): failed to open stream: {}", port, e),
            file!(),
            line!(),
        )),
    }
}
