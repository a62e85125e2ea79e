//! HTTP server for puented.

use crate::routes;
use anyhow::Result;
use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use puente_common::{
    ErrorHandling, ErrorInterceptor, FaultDispatcher, PuenteConfig, RenderedPage, RuntimePolicy,
    UncaughtFault,
};
use std::any::Any;
use std::backtrace::Backtrace;
use std::sync::Arc;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
pub struct AppState {
    pub policy: RuntimePolicy,
    pub config: PuenteConfig,
    pub interceptor: Arc<ErrorInterceptor>,
    pub dispatcher: Arc<FaultDispatcher>,
}

impl AppState {
    pub fn new(policy: RuntimePolicy, config: PuenteConfig, handles: ErrorHandling) -> Self {
        Self {
            policy,
            config,
            interceptor: Arc::new(handles.interceptor),
            dispatcher: Arc::new(handles.dispatcher),
        }
    }
}

/// Convert a rendered error page into an HTTP response.
pub fn page_response(page: RenderedPage) -> Response {
    let status =
        StatusCode::from_u16(page.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, page.content_type)
        .body(Body::from(page.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Panic boundary: a panic escaping a handler is an uncaught fault and is
/// rendered through the dispatcher like any other.
#[derive(Clone)]
pub struct DispatchPanic {
    dispatcher: Arc<FaultDispatcher>,
}

impl ResponseForPanic for DispatchPanic {
    type ResponseBody = Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn Any + Send + 'static>,
    ) -> axum::http::Response<Self::ResponseBody> {
        page_response(self.dispatcher.dispatch(&panic_fault(err)))
    }
}

pub fn panic_layer(dispatcher: Arc<FaultDispatcher>) -> CatchPanicLayer<DispatchPanic> {
    CatchPanicLayer::custom(DispatchPanic { dispatcher })
}

fn panic_fault(err: Box<dyn Any + Send + 'static>) -> UncaughtFault {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "panic no identificado".to_string()
    };

    UncaughtFault {
        message,
        // The payload does not carry its origin; the trace below does.
        file: "desconocido".to_string(),
        line: 0,
        trace: Backtrace::force_capture().to_string(),
        cause: Some("panic".to_string()),
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    let dispatcher = state.dispatcher.clone();

    Router::new()
        .merge(routes::health_routes())
        .merge(routes::device_routes())
        .with_state(state)
        .layer(panic_layer(dispatcher))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until the process is stopped.
pub async fn run(state: AppState, bind: &str) -> Result<()> {
    let state = Arc::new(state);
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("  Listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::Request;
    use axum::routing::get;
    use puente_common::MISSING_PRESENTER_BODY;
    use tower::util::ServiceExt;

    #[tokio::test]
    #[allow(dependency_on_unit_never_type_fallback)]
    async fn test_panic_is_dispatched_as_uncaught_fault() {
        let dispatcher = Arc::new(FaultDispatcher::new(RuntimePolicy::production(), None));
        let app: Router = Router::new()
            .route("/boom", get(|| async { panic!("se rompió todo") }))
            .layer(panic_layer(dispatcher));

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // No presenter installed: the fixed abort body, in any mode.
        assert_eq!(body, MISSING_PRESENTER_BODY.as_bytes());
    }

    #[test]
    fn test_panic_fault_extracts_str_payload() {
        let fault = panic_fault(Box::new("sin memoria"));
        assert_eq!(fault.message, "sin memoria");
        assert_eq!(fault.cause.as_deref(), Some("panic"));

        let fault = panic_fault(Box::new(String::from("otro fallo")));
        assert_eq!(fault.message, "otro fallo");

        let fault = panic_fault(Box::new(42_u32));
        assert_eq!(fault.message, "panic no identificado");
    }

    #[test]
    fn test_page_response_sets_status_and_content_type() {
        let response = page_response(RenderedPage::html("<h1>Error interno</h1>"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }
}
