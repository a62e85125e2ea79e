//! Puente Common - error interception core for the Arduino web bridge.
//!
//! Two collaborating handlers, built once at process start:
//! the runtime error interceptor (device diagnostics, escalation,
//! policy-gated suppression) and the uncaught fault dispatcher
//! (presenter delegation with local fallbacks).

pub mod config;
pub mod context;
pub mod device_log;
pub mod dispatcher;
pub mod event;
pub mod general_log;
pub mod interceptor;
pub mod level;
pub mod policy;

pub use config::*;
pub use context::*;
pub use device_log::*;
pub use dispatcher::*;
pub use event::*;
pub use general_log::*;
pub use interceptor::*;
pub use level::*;
pub use policy::*;

use std::sync::Arc;

/// The installed interception layer.
pub struct ErrorHandling {
    pub interceptor: ErrorInterceptor,
    pub dispatcher: FaultDispatcher,
}

/// Build the interception layer once at process start.
///
/// Every collaborator is explicit: policy, device configuration, log
/// locations and the presenter. Nothing global is mutated, and there is no
/// uninstall path; the handles live for the process lifetime.
pub fn install(
    policy: RuntimePolicy,
    device: DeviceConfig,
    log: &LogConfig,
    presenter: Option<Arc<dyn ErrorPresenter>>,
) -> ErrorHandling {
    let device_log = DeviceErrorLog::new(&log.base_dir);
    let general: Arc<dyn GeneralLog> = Arc::new(FileGeneralLog::new(log.general.clone()));

    ErrorHandling {
        interceptor: ErrorInterceptor::new(policy, device, device_log, general),
        dispatcher: FaultDispatcher::new(policy, presenter),
    }
}
