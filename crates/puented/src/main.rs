//! Puente daemon - HTTP bridge for an Arduino on a serial port.
//!
//! Installs the error interception layer at startup and serves the bridge
//! API. Debug disclosure is controlled by `APP_DEBUG` (the literal "true").

mod presenter;
mod routes;
mod serial;
mod server;

use anyhow::Result;
use clap::Parser;
use presenter::HtmlPresenter;
use puente_common::{install, ErrorPresenter, PuenteConfig, RuntimePolicy};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "puented", version, about = "Arduino web bridge daemon")]
struct Args {
    /// Configuration file.
    #[arg(long, default_value = "puente.toml")]
    config: PathBuf,

    /// Override the bind address from the configuration file.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let policy = RuntimePolicy::from_env();

    // Debug mode surfaces everything; production keeps notices quiet.
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", if policy.debug { "debug" } else { "info" });
    }
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_level(true)
        .init();

    let config = PuenteConfig::load(&args.config)?;
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());

    info!(
        "puented {} starting (debug={}, port={})",
        env!("CARGO_PKG_VERSION"),
        policy.debug,
        config.device.port.as_deref().unwrap_or("sin configurar"),
    );

    // Availability probe: without its template the presenter is not
    // installable, and uncaught faults get the fixed abort response.
    let presenter: Option<Arc<dyn ErrorPresenter>> = if config.presenter.template.exists() {
        Some(Arc::new(HtmlPresenter::new(&config.presenter.template)))
    } else {
        warn!(
            "plantilla de errores ausente: {}",
            config.presenter.template.display()
        );
        None
    };
    let handles = install(policy, config.device.clone(), &config.log, presenter);

    server::run(server::AppState::new(policy, config, handles), &bind).await
}
