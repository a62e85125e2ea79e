//! General-purpose log sink.
//!
//! Receives exactly one line per suppressed event. The sink is injected so
//! the daemon writes to a file while tests capture lines in memory.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// Append-only sink for suppressed-event lines. Best effort: a failing
/// sink never raises into the interception path.
pub trait GeneralLog: Send + Sync {
    fn record(&self, line: &str);
}

/// File-backed general log, append mode.
#[derive(Debug)]
pub struct FileGeneralLog {
    path: PathBuf,
}

impl FileGeneralLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GeneralLog for FileGeneralLog {
    fn record(&self, line: &str) {
        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            writeln!(file, "{}", line)
        })();

        if let Err(e) = result {
            debug!("general log write failed: {}", e);
        }
    }
}

/// In-memory general log for tests.
#[derive(Debug, Default)]
pub struct MemoryGeneralLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryGeneralLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl GeneralLog for MemoryGeneralLog {
    fn record(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_log_captures_lines() {
        let log = MemoryGeneralLog::new();
        log.record("primera");
        log.record("segunda");
        assert_eq!(log.lines(), vec!["primera", "segunda"]);
    }

    #[test]
    fn test_file_log_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("puente.log");
        let log = FileGeneralLog::new(&path);

        log.record("Error PHP (2): algo en serial.rs:21");
        log.record("Error PHP (8): otra cosa en routes.rs:7");

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Error PHP (2):"));
    }
}
