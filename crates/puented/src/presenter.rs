//! HTML error presenter.
//!
//! Renders the error page from a template file with placeholder
//! substitution. Read failures surface as presenter errors so the
//! dispatcher can fall back to its plain responses.

use puente_common::{ErrorPresenter, ErrorView, PresenterError, RenderedPage};
use std::fs;
use std::path::PathBuf;

pub struct HtmlPresenter {
    template: PathBuf,
}

impl HtmlPresenter {
    pub fn new(template: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl ErrorPresenter for HtmlPresenter {
    fn render(&self, view: &ErrorView) -> Result<RenderedPage, PresenterError> {
        let template = fs::read_to_string(&self.template).map_err(|e| {
            PresenterError::new(
                format!("no se pudo leer {}: {}", self.template.display(), e),
                file!(),
                line!(),
            )
        })?;

        let body = template
            .replace("{{status}}", &view.status.to_string())
            .replace("{{title}}", &escape_html(&view.title))
            .replace("{{message}}", &escape_html(&view.message))
            .replace("{{details}}", &escape_html(&view.details));

        Ok(RenderedPage::html(body))
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
