use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use utilityguy::api::create_router;
use utilityguy::config::{CONFIG, Overrides, Settings};
use utilityguy::responder::{Responder, ResponseTable};

/// Canned-response chatbot API for the UtilityGuy dashboard.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// JSON file of phrase -> response pairs (overrides RESPONSES_FILE)
    #[arg(long)]
    responses: Option<PathBuf>,

    /// trace, debug, info, warn or error (overrides LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,
}

impl From<Args> for Overrides {
    fn from(args: Args) -> Self {
        Overrides {
            host: args.host,
            port: args.port,
            responses_file: args.responses,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::resolve(&CONFIG, Args::parse().into())?;

    // Also installs the log -> tracing bridge, so log::info! etc. work
    tracing_subscriber::fmt()
        .with_max_level(settings.log_level)
        .with_target(true)
        .init();

    let table = match &settings.responses_file {
        Some(path) => ResponseTable::from_json_file(path)
            .with_context(|| format!("Failed to load responses from {}", path.display()))?,
        None => ResponseTable::builtin(),
    };
    tracing::info!("Serving {} phrases", table.phrases().len());

    let app = create_router(Arc::new(Responder::new(table)));

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
