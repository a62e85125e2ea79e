//! Error events and faults flowing through the interception layer.

use crate::level::ErrorLevel;
use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;

/// A single runtime error event, created at the point of failure and
/// consumed synchronously by the interceptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub level: ErrorLevel,
    pub message: String,
    /// Source file the event originated from.
    pub file: String,
    /// Source line the event originated from.
    pub line: u32,
    /// Trace captured at the original fault site, when the reporter has
    /// one. Events without it get a trace captured at interception time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backtrace: Option<String>,
}

impl ErrorEvent {
    pub fn new(
        level: ErrorLevel,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            level,
            message: message.into(),
            file: file.into(),
            line,
            backtrace: None,
        }
    }

    /// Attach the trace captured at the fault site.
    pub fn with_backtrace(mut self, trace: impl Into<String>) -> Self {
        self.backtrace = Some(trace.into());
        self
    }
}

/// A runtime error the interceptor promoted to a fault.
///
/// The caller must propagate it to the dispatcher; normal handling of the
/// triggering event ends here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalatedFault {
    pub level: ErrorLevel,
    pub message: String,
    pub file: String,
    pub line: u32,
}

/// A fault that reached the request boundary unhandled.
#[derive(Debug, Clone)]
pub struct UncaughtFault {
    pub message: String,
    pub file: String,
    pub line: u32,
    pub trace: String,
    pub cause: Option<String>,
}

impl From<EscalatedFault> for UncaughtFault {
    fn from(fault: EscalatedFault) -> Self {
        Self {
            message: fault.message,
            file: fault.file,
            line: fault.line,
            trace: Backtrace::force_capture().to_string(),
            cause: Some(format!("escalated {}", fault.level.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let event = ErrorEvent::new(ErrorLevel::Warning, "puerto cerrado", "serial.rs", 42);
        assert!(event.backtrace.is_none());

        let event = event.with_backtrace("frame 0: open_port");
        assert_eq!(event.backtrace.as_deref(), Some("frame 0: open_port"));
    }

    #[test]
    fn test_escalated_fault_carries_source_location() {
        let fault = EscalatedFault {
            level: ErrorLevel::UserError,
            message: "bad state".to_string(),
            file: "routes.rs".to_string(),
            line: 7,
        };
        let uncaught: UncaughtFault = fault.into();
        assert_eq!(uncaught.message, "bad state");
        assert_eq!(uncaught.file, "routes.rs");
        assert_eq!(uncaught.line, 7);
        assert_eq!(uncaught.cause.as_deref(), Some("escalated user_error"));
        assert!(!uncaught.trace.is_empty());
    }
}
