//! Runtime error interceptor.
//!
//! Receives every non-fatal runtime error event, records the dedicated
//! device log entry when the message carries a subsystem marker, escalates
//! severe levels into faults, and suppresses the rest according to policy.
//! Device logging always runs before the severity and policy branches.

use std::backtrace::Backtrace;
use std::sync::Arc;

use crate::config::DeviceConfig;
use crate::context::DiagnosticContext;
use crate::device_log::{self, DeviceErrorLog};
use crate::event::{ErrorEvent, EscalatedFault};
use crate::general_log::GeneralLog;
use crate::policy::RuntimePolicy;
use tracing::debug;

/// What the interceptor decided for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interception {
    /// The event became a fault the caller must propagate to the
    /// dispatcher. Chosen for the closed escalation set, in both modes.
    Escalated(EscalatedFault),
    /// Recorded in the general log; default display stays off (production).
    Suppressed,
    /// Left to the runtime's own display (debug mode). Nothing is written
    /// to the general log.
    PassThrough,
}

pub struct ErrorInterceptor {
    policy: RuntimePolicy,
    device: DeviceConfig,
    device_log: DeviceErrorLog,
    general_log: Arc<dyn GeneralLog>,
}

impl ErrorInterceptor {
    pub fn new(
        policy: RuntimePolicy,
        device: DeviceConfig,
        device_log: DeviceErrorLog,
        general_log: Arc<dyn GeneralLog>,
    ) -> Self {
        Self {
            policy,
            device,
            device_log,
            general_log,
        }
    }

    pub fn device_log(&self) -> &DeviceErrorLog {
        &self.device_log
    }

    /// Handle one runtime error event.
    pub fn intercept(&self, event: &ErrorEvent) -> Interception {
        if device_log::is_device_message(&event.message) {
            let context = DiagnosticContext::collect(&self.device);
            let trace = match &event.backtrace {
                Some(t) => t.clone(),
                None => Backtrace::force_capture().to_string(),
            };
            // Best effort: a failing diagnostic channel must not raise.
            if let Err(e) = self.device_log.append(event, &context, &trace) {
                debug!("device error log write failed: {}", e);
            }
        }

        if event.level.escalates() {
            return Interception::Escalated(EscalatedFault {
                level: event.level,
                message: event.message.clone(),
                file: event.file.clone(),
                line: event.line,
            });
        }

        if !self.policy.debug {
            // Legacy line format; existing scrapers parse it.
            self.general_log.record(&format!(
                "Error PHP ({}): {} en {}:{}",
                event.level.code(),
                event.message,
                event.file,
                event.line
            ));
            return Interception::Suppressed;
        }

        Interception::PassThrough
    }
}
