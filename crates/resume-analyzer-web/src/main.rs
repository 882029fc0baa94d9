use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use clap::Parser;
use tower_http::trace::TraceLayer;

use resume_analyzer_core::config_file::{self, ConfigFile};
use resume_analyzer_core::{Analyzer, Config, GeminiClient};

mod handlers;
mod models;
mod state;
mod upload;

use state::AppState;

/// Resume analysis server - extract text from an uploaded resume and review it with Gemini
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (default: .resume-analyzer.toml over the platform config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides HOST and the config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT and the config file)
    #[arg(long)]
    port: Option<u16>,
}

/// Build the application router.
///
/// `max_upload_bytes` of `None` lifts axum's default request body cap so
/// uploads of any size are accepted.
pub fn app(state: Arc<AppState>, max_upload_bytes: Option<usize>) -> axum::Router {
    let body_limit = match max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    axum::Router::new()
        .route(
            "/analyze-resume/",
            axum::routing::post(handlers::analyze::analyze_resume),
        )
        .route(
            "/analyze-resume",
            axum::routing::post(handlers::analyze::analyze_resume),
        )
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn load_config_file(path: Option<&PathBuf>) -> anyhow::Result<ConfigFile> {
    match path {
        Some(path) => config_file::load_from_path(path)
            .with_context(|| format!("could not read config file {}", path.display())),
        None => Ok(config_file::load_config()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut config = Config::from_env(load_config_file(cli.config.as_ref())?)?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let extractor = resume_analyzer_ingest::default_extractor(&config.extractor);
    let model = Arc::new(GeminiClient::new(config.model.clone()));
    let state = Arc::new(AppState {
        analyzer: Analyzer::new(extractor, model),
    });
    tracing::info!(model = state.analyzer.model_name(), "analyzer ready");

    let app = app(state, config.server.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server.host))?;
    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
