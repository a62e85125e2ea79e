//! Runtime error levels.
//!
//! Numeric codes follow the legacy runtime numbering so existing consumers
//! of the log files keep parsing `Level:` fields unchanged.

use serde::{Deserialize, Serialize};

/// Classification of a runtime error event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorLevel {
    /// Informational notice.
    Notice,
    /// Non-fatal warning.
    Warning,
    /// Use of a deprecated construct.
    Deprecated,
    /// Error the runtime could recover from at the fault site.
    RecoverableError,
    /// Error raised explicitly by application code.
    UserError,
    /// Fatal runtime error.
    Fatal,
    /// Fatal error during runtime startup.
    CoreError,
    /// Fatal error while loading a unit of code.
    CompileError,
    /// Source could not be parsed.
    Parse,
}

impl ErrorLevel {
    /// Legacy numeric code, written verbatim into log lines.
    pub fn code(&self) -> u32 {
        match self {
            ErrorLevel::Fatal => 1,
            ErrorLevel::Warning => 2,
            ErrorLevel::Parse => 4,
            ErrorLevel::Notice => 8,
            ErrorLevel::CoreError => 16,
            ErrorLevel::CompileError => 64,
            ErrorLevel::UserError => 256,
            ErrorLevel::RecoverableError => 4096,
            ErrorLevel::Deprecated => 8192,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorLevel::Notice => "notice",
            ErrorLevel::Warning => "warning",
            ErrorLevel::Deprecated => "deprecated",
            ErrorLevel::RecoverableError => "recoverable_error",
            ErrorLevel::UserError => "user_error",
            ErrorLevel::Fatal => "fatal",
            ErrorLevel::CoreError => "core_error",
            ErrorLevel::CompileError => "compile_error",
            ErrorLevel::Parse => "parse",
        }
    }

    /// Whether this level always converts into an escalated fault.
    ///
    /// The set is closed and independent of debug mode and of any
    /// subsystem match on the message.
    pub fn escalates(&self) -> bool {
        matches!(
            self,
            ErrorLevel::Fatal
                | ErrorLevel::CoreError
                | ErrorLevel::CompileError
                | ErrorLevel::Parse
                | ErrorLevel::RecoverableError
                | ErrorLevel::UserError
        )
    }
}
