//! Uncaught fault dispatcher.
//!
//! Terminal handler for faults that reached the request boundary. Delegates
//! to the error presenter, with a fixed abort when no presenter is installed
//! and a debug-conditional fallback when the presenter itself fails. Every
//! outcome carries status 500; nothing is retried.

use crate::event::UncaughtFault;
use crate::policy::RuntimePolicy;
use std::sync::Arc;
use thiserror::Error;

/// Fixed abort body when no presenter collaborator is installed.
pub const MISSING_PRESENTER_BODY: &str =
    "Error crítico: No se pudo cargar el controlador de errores.";

/// Production fallback body when the presenter itself fails.
pub const GENERIC_FAILURE_BODY: &str =
    "Error interno del servidor. Por favor, intente más tarde.";

/// Title used for every delegated error page.
pub const ERROR_TITLE: &str = "Error interno";

/// Structured data handed to the presenter.
#[derive(Debug, Clone)]
pub struct ErrorView {
    pub status: u16,
    pub title: String,
    pub message: String,
    pub details: String,
}

/// A rendered error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl RenderedPage {
    pub fn plain(body: impl Into<String>) -> Self {
        Self {
            status: 500,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 500,
            content_type: "text/html; charset=utf-8",
            body: body.into(),
        }
    }
}

/// Failure reported by a presenter, with the failure site when known.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PresenterError {
    pub message: String,
    pub file: String,
    pub line: u32,
}

impl PresenterError {
    pub fn new(message: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            file: file.into(),
            line,
        }
    }
}

/// External collaborator rendering the human-facing error page.
pub trait ErrorPresenter: Send + Sync {
    fn render(&self, view: &ErrorView) -> Result<RenderedPage, PresenterError>;
}

pub struct FaultDispatcher {
    policy: RuntimePolicy,
    presenter: Option<Arc<dyn ErrorPresenter>>,
}

impl FaultDispatcher {
    pub fn new(policy: RuntimePolicy, presenter: Option<Arc<dyn ErrorPresenter>>) -> Self {
        Self { policy, presenter }
    }

    /// Dispatch one uncaught fault. The returned page ends the response.
    pub fn dispatch(&self, fault: &UncaughtFault) -> RenderedPage {
        let presenter = match &self.presenter {
            Some(p) => p,
            None => return RenderedPage::plain(MISSING_PRESENTER_BODY),
        };

        let view = ErrorView {
            status: 500,
            title: ERROR_TITLE.to_string(),
            message: fault.message.clone(),
            details: format!(
                "File: {} on line {}\nTrace: {}",
                fault.file, fault.line, fault.trace
            ),
        };

        match presenter.render(&view) {
            Ok(page) => page,
            Err(e) if self.policy.debug => RenderedPage::plain(format!(
                "Error crítico: {}\nEn archivo: {} línea: {}",
                e.message, e.file, e.line
            )),
            Err(_) => RenderedPage::plain(GENERIC_FAILURE_BODY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OkPresenter;

    impl ErrorPresenter for OkPresenter {
        fn render(&self, view: &ErrorView) -> Result<RenderedPage, PresenterError> {
            Ok(RenderedPage::html(format!(
                "<h1>{}</h1><p>{}</p>",
                view.title, view.message
            )))
        }
    }

    struct BrokenPresenter;

    impl ErrorPresenter for BrokenPresenter {
        fn render(&self, _view: &ErrorView) -> Result<RenderedPage, PresenterError> {
            Err(PresenterError::new(
                "plantilla ilegible",
                "presenter.rs",
                14,
            ))
        }
    }

    fn fault() -> UncaughtFault {
        UncaughtFault {
            message: "estado inconsistente".to_string(),
            file: "routes.rs".to_string(),
            line: 7,
            trace: "frame 0: handler".to_string(),
            cause: None,
        }
    }

    #[test]
    fn test_missing_presenter_aborts_in_both_modes() {
        for policy in [RuntimePolicy::debug(), RuntimePolicy::production()] {
            let dispatcher = FaultDispatcher::new(policy, None);
            let page = dispatcher.dispatch(&fault());
            assert_eq!(page.status, 500);
            assert_eq!(page.body, MISSING_PRESENTER_BODY);
        }
    }

    #[test]
    fn test_delegation_returns_presenter_output() {
        let dispatcher =
            FaultDispatcher::new(RuntimePolicy::production(), Some(Arc::new(OkPresenter)));
        let page = dispatcher.dispatch(&fault());
        assert_eq!(page.status, 500);
        assert_eq!(page.body, "<h1>Error interno</h1><p>estado inconsistente</p>");
    }

    #[test]
    fn test_fallback_discloses_only_in_debug() {
        let dispatcher =
            FaultDispatcher::new(RuntimePolicy::debug(), Some(Arc::new(BrokenPresenter)));
        let page = dispatcher.dispatch(&fault());
        assert_eq!(page.status, 500);
        assert_eq!(
            page.body,
            "Error crítico: plantilla ilegible\nEn archivo: presenter.rs línea: 14"
        );
    }

    #[test]
    fn test_fallback_is_generic_in_production() {
        let dispatcher = FaultDispatcher::new(
            RuntimePolicy::production(),
            Some(Arc::new(BrokenPresenter)),
        );
        let page = dispatcher.dispatch(&fault());
        assert_eq!(page.status, 500);
        assert_eq!(page.body, GENERIC_FAILURE_BODY);
        // Nothing from the secondary failure leaks.
        assert!(!page.body.contains("plantilla"));
        assert!(!page.body.contains("presenter.rs"));
    }

    #[test]
    fn test_view_details_carry_source_and_trace() {
        struct CapturePresenter(std::sync::Mutex<Option<ErrorView>>);
        impl ErrorPresenter for CapturePresenter {
            fn render(&self, view: &ErrorView) -> Result<RenderedPage, PresenterError> {
                *self.0.lock().unwrap() = Some(view.clone());
                Ok(RenderedPage::html("ok"))
            }
        }

        let capture = Arc::new(CapturePresenter(std::sync::Mutex::new(None)));
        let dispatcher =
            FaultDispatcher::new(RuntimePolicy::production(), Some(capture.clone()));
        dispatcher.dispatch(&fault());

        let view = capture.0.lock().unwrap().clone().unwrap();
        assert_eq!(view.status, 500);
        assert_eq!(view.title, ERROR_TITLE);
        assert_eq!(
            view.details,
            "File: routes.rs on line 7\nTrace: frame 0: handler"
        );
    }
}
