use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use trace_sandbox::config::{self, ServiceConfig};
use trace_sandbox::observability::logging;
use trace_sandbox::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "trace-sandbox")]
#[command(about = "Demo HTTP service for exercising logging and tracing", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. "127.0.0.1:3000").
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.logging);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        service = %config.logging.service_name,
        "trace-sandbox starting"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let handle = shutdown.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config);
    server.run(listener, handle).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
