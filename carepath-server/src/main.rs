//! carepath HTTP backend.
//!
//! Env: `.env` then process env. Collaborator keys as in [`carepath::SetupConfig`], plus
//! `LISTEN`, `UPLOAD_DIR`, `RUN_TIMEOUT_SECS`. `LOG_FILE` also writes logs to that file;
//! `RUST_LOG` overrides the default filter.

use std::sync::Arc;

use carepath::{build_collaborators, ConsultationGraph, Workflow};
use carepath_server::{app, AppState, ServerConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn load_dotenv() {
    if dotenv::dotenv().is_err() {
        let _ = dotenv::from_path(
            std::env::current_dir()
                .unwrap_or_default()
                .join("..")
                .join(".env"),
        );
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,carepath=debug,tower_http=info"));
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let file = std::env::var("LOG_FILE")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| eprintln!("cannot open LOG_FILE {}: {}", path, e))
                .ok()
        })
        .map(|f| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(f))
        });
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    load_dotenv();
    init_tracing();

    let config = ServerConfig::from_env();
    let collaborators = build_collaborators(&config.setup).await?;
    let state = Arc::new(AppState {
        consultation: ConsultationGraph::build(Workflow::Consultation, &collaborators)?,
        hospitals: ConsultationGraph::build(Workflow::Hospitals, &collaborators)?,
        upload_dir: config.upload_dir.clone(),
        output_dir: config.setup.output_dir.clone(),
        run_timeout: config.run_timeout,
    });

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    tracing::info!(addr = %config.listen, "carepath server listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
