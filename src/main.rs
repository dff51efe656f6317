mod api;
mod dashboard;
mod report;
mod store;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dashboard::{ControlId, Dashboard, ReportClient, TerminalSurface};

#[derive(Parser, Debug)]
#[command(
    name = "bandreportd",
    version,
    about = "Language assessment report service and dashboard"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(about = "Serve the report API and the static dashboard")]
    Serve {
        #[arg(long, env = "BANDREPORT_HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(
            long,
            env = "BANDREPORT_PORT",
            default_value_t = 3000,
            help = "0 picks a free port"
        )]
        port: u16,

        #[arg(
            long,
            env = "BANDREPORT_DATA",
            default_value = "data/report.json",
            value_name = "FILE"
        )]
        data: PathBuf,

        #[arg(
            long,
            env = "BANDREPORT_STATIC_DIR",
            default_value = "client",
            value_name = "DIR"
        )]
        static_dir: PathBuf,
    },
    #[command(about = "Render the report in the terminal; reads commands from stdin")]
    Dashboard {
        #[arg(long, env = "BANDREPORT_URL", default_value = "http://localhost:3000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Serve {
            host,
            port,
            data,
            static_dir,
        } => serve(&host, port, data, static_dir).await,
        Command::Dashboard { url } => run_dashboard(url).await,
    }
}

async fn serve(host: &str, port: u16, data: PathBuf, static_dir: PathBuf) -> anyhow::Result<()> {
    // No record, no service.
    let store = store::ReportStore::load(&data).await?;
    let state = api::AppState::new(store);
    let app = api::router(state, &api::ServeOptions { static_dir });

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr().context("failed to read bound address")?;

    info!("server running at http://{local}");
    // Callers that asked for port 0 read the real port from this line.
    println!("listening on http://{local}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

const USAGE: &str = "commands: set <overall|pronunciation|fluency> <0-9>, confirm, show, quit";

async fn run_dashboard(url: String) -> anyhow::Result<()> {
    let surface = TerminalSurface::new(std::io::stdout());
    let mut dash = Dashboard::new(ReportClient::new(url), surface);
    dash.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        dash.sweep_notices(Instant::now());

        let mut words = line.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (None, _, _) => continue,
            (Some("quit"), None, None) => break,
            (Some("show"), None, None) => dash.redraw(),
            (Some("confirm"), None, None) => {
                dash.confirm().await;
            }
            (Some("set"), Some(name), Some(value)) => {
                match (ControlId::parse(name), value.parse::<i64>()) {
                    (Some(id), Ok(v)) => {
                        dash.set_control(id, v);
                    }
                    _ => println!("{USAGE}"),
                }
            }
            _ => println!("{USAGE}"),
        }
    }
    Ok(())
}
