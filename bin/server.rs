// Transaction Insights - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use axum::{
    extract::{MatchedPath, Request},
    Router,
};
use clap::Parser;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use txn_insights::{build_router, AppConfig, SourceArgs};

/// JSON API over the transaction CSV.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    source: SourceArgs,

    /// Address to listen on
    #[arg(long, env = "TXN_HOST", default_value = "127.0.0.1")]
    host: std::net::IpAddr,

    /// The port to serve the API from
    #[arg(short, long, env = "TXN_PORT", default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let args = Args::parse();
    let config = AppConfig::from_args(&args.source).context("Failed to load configuration")?;

    if !config.data_path.exists() {
        // Not fatal: the file is read per request and may appear later
        tracing::warn!("Data file {} does not exist yet", config.data_path.display());
    }
    tracing::info!(
        "Serving {} with {} category groups",
        config.data_path.display(),
        config.rules.group_count()
    );

    let app = add_tracing_layer(build_router(config));

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::debug!("Received ctrl+c signal.");
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "txn_insights=info,{}=info,tower_http=info",
            env!("CARGO_CRATE_NAME")
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        let method = req.method();
        let uri = req.uri();

        let matched_path = req
            .extensions()
            .get::<MatchedPath>()
            .map(|matched_path| matched_path.as_str());

        tracing::debug_span!("request", %method, %uri, matched_path)
    });

    router.layer(tracing_layer)
}
