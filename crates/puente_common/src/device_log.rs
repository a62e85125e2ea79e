//! Dedicated device error log.
//!
//! Every runtime error whose message carries a subsystem marker is recorded
//! here, in both debug and production, at `<base>/logs/arduino_errors.log`.
//! Append-only: no rotation, no deduplication, write order only. Concurrent
//! appends rely on the append primitive; interleaved partial writes are an
//! accepted risk.

use crate::context::DiagnosticContext;
use crate::event::ErrorEvent;
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Markers identifying device/serial related messages.
/// Matching is a case-sensitive substring search.
pub const DEVICE_MARKERS: [&str; 4] = ["COM", "fopen", "puerto serial", "serial port"];

const SEPARATOR: &str = "----------------------------------------";

/// Whether the message belongs to the device subsystem.
pub fn is_device_message(message: &str) -> bool {
    DEVICE_MARKERS.iter().any(|m| message.contains(m))
}

/// Append-only writer for the device error log.
#[derive(Debug, Clone)]
pub struct DeviceErrorLog {
    path: PathBuf,
}

impl DeviceErrorLog {
    /// Log file under `base_dir`: `logs/arduino_errors.log`.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            path: base_dir.as_ref().join("logs").join("arduino_errors.log"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the log directory exists. Idempotent and safe to race.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(dir, fs::Permissions::from_mode(0o755))?;
            }
        }
        Ok(())
    }

    /// Append one record for the event.
    pub fn append(
        &self,
        event: &ErrorEvent,
        context: &DiagnosticContext,
        trace: &str,
    ) -> std::io::Result<()> {
        self.ensure_dir()?;

        let record = format!(
            "{} [ARDUINO ERROR] Level: {}, Message: {}, File: {}:{}\nContext: {}\nStack trace: {}\n{}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            event.level.code(),
            event.message,
            event.file,
            event.line,
            context.to_json(),
            trace,
            SEPARATOR
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(record.as_bytes())?;

        Ok(())
    }

    /// Read back the last `limit` records, oldest first. A missing file
    /// yields an empty list.
    pub fn recent(&self, limit: usize) -> Vec<String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        let records: Vec<String> = content
            .split(SEPARATOR)
            .map(|r| r.trim_matches('\n').to_string())
            .filter(|r| !r.is_empty())
            .collect();

        let skip = records.len().saturating_sub(limit);
        records.into_iter().skip(skip).collect()
    }
}
