use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sheetsearch::{api, config, logging, search::SearchService};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(
    name = "sheetsearch",
    about = "Semantic search over a Google Sheet, served from Elasticsearch"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Sync the worksheet into the index, then serve HTTP requests (default).
    Serve {
        /// Serve the existing index without re-reading the worksheet.
        #[arg(long)]
        skip_sync: bool,
    },
    /// Sync the worksheet into the index once and exit.
    Sync,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing();
    let config = config::init_config().context("failed to load configuration")?;
    let service = Arc::new(SearchService::new(config).context("failed to build search service")?);

    match cli.command.unwrap_or(Command::Serve { skip_sync: false }) {
        Command::Sync => {
            service.sync().await.context("initial sync failed")?;
            Ok(())
        }
        Command::Serve { skip_sync } => {
            if !skip_sync {
                service.sync().await.context("initial sync failed")?;
            }
            let app = api::create_router(service);
            let (listener, port) = bind_listener(config.server_port)
                .await
                .context("failed to bind listener")?;
            tracing::info!("Listening on http://0.0.0.0:{}", port);
            axum::serve(listener, app)
                .await
                .context("HTTP server terminated unexpectedly")
        }
    }
}

async fn bind_listener(port: Option<u16>) -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    if let Some(port) = port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 5000..=5099;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 5000-5099",
    ))
}
