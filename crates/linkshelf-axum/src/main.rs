use clap::Parser;
use linkshelf_axum::{AppState, config::Config, router};
use linkshelf_core::MemoryStore;
use miette::{IntoDiagnostic, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve a cursor-paginated link collection over HTTP")]
struct Args {
    /// Path to KDL config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the config file
    #[arg(short = 'b', long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_env_filter(EnvFilter::from_env("LINKSHELF_LOG"))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).into_diagnostic()?;
            Config::from_kdl(&text)?
        }
        None => Config::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let store = MemoryStore::new();
    config.seed(&store).await?;

    let app = router(AppState::new(store, config.identity.clone()));

    let listener = tokio::net::TcpListener::bind(config.server.bind)
        .await
        .into_diagnostic()?;
    tracing::info!(bind = %config.server.bind, "listening");
    axum::serve(listener, app).await.into_diagnostic()?;
    Ok(())
}
