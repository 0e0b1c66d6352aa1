mod console;

use anyhow::{Context, Result};
use attendance::client::HttpAttendanceServer;
use attendance::notifier::Notifier;
use attendance::rotator::{LocationReporter, TokenRotator};
use attendance::verifier::Verifier;
use clap::{Parser, Subcommand};
use console::{Console, StdinLines, StdinScanner};
use std::sync::Arc;
use util::config::{self, AppConfig};
use util::logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "bus-client", version, about)]
struct Cli {
    /// Attendance server base URL. Defaults to SERVER_URL.
    #[arg(long, global = true)]
    server: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the bus position and display rotating codes
    Driver {
        /// Bus number to report for. Defaults to BUS_NO.
        #[arg(long)]
        bus: Option<String>,
        /// Only report the position, without displaying codes
        #[arg(long)]
        no_qr: bool,
    },
    /// Scan a code from stdin and mark attendance
    Student,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(server) = cli.server {
        AppConfig::set_server_url(server);
    }

    let _log_guard = init_logging("bus_client");

    match cli.command {
        Command::Driver { bus, no_qr } => run_driver(bus.unwrap_or_else(config::bus_no), !no_qr).await,
        Command::Student => run_student().await,
    }
}

async fn run_driver(bus_no: String, show_codes: bool) -> Result<()> {
    let server = Arc::new(
        HttpAttendanceServer::new(config::server_url())
            .context("Failed to build HTTP client")?
            .with_bus(bus_no.clone()),
    );
    let console = Arc::new(Console);

    let mut reporter = LocationReporter::new(
        console::location_provider(),
        server.clone(),
        console.clone(),
        Notifier::new(console.clone()),
    );
    let mut rotator = TokenRotator::new(server, console);

    println!("Driving {bus_no} against {}. Ctrl+C stops.", config::server_url());
    reporter.start_tracking(bus_no);
    if show_codes {
        rotator.start_rotation();
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    reporter.stop();
    rotator.stop();
    tracing::info!("Driver session ended");
    Ok(())
}

async fn run_student() -> Result<()> {
    let server = Arc::new(
        HttpAttendanceServer::new(config::server_url()).context("Failed to build HTTP client")?,
    );
    let lines = console::stdin_lines();
    let scanner = Arc::new(StdinScanner::new(lines.clone()));
    let console = Arc::new(Console);

    let new_verifier = || {
        Verifier::new(
            scanner.clone(),
            console::location_provider(),
            server.clone(),
            console.clone(),
            Notifier::new(console.clone()),
            console::device_profile(),
        )
    };
    let mut verifier = new_verifier();

    loop {
        let Some(outcome) = until_interrupted(verifier.run()).await else {
            break;
        };
        outcome?;

        match verifier.pending_reset() {
            Some(reload) => {
                let Some(joined) = until_interrupted(reload).await else {
                    break;
                };
                joined.context("Reload task failed")?;
                verifier = new_verifier();
            }
            None => {
                if until_interrupted(wait_for_enter(&lines)).await != Some(true) {
                    break;
                }
                verifier.restart();
            }
        }
    }

    tracing::info!("Student session ended");
    Ok(())
}

/// Every wait in the student loop goes through here, so Ctrl+C ends the session
/// at any point.
async fn until_interrupted<T>(work: impl Future<Output = T>) -> Option<T> {
    until(work, tokio::signal::ctrl_c()).await
}

/// Runs `work` unless `shutdown` completes first.
async fn until<T, S>(work: impl Future<Output = T>, shutdown: impl Future<Output = S>) -> Option<T> {
    tokio::select! {
        out = work => Some(out),
        _ = shutdown => None,
    }
}

/// Returns `false` once stdin is closed.
async fn wait_for_enter(lines: &StdinLines) -> bool {
    lines.lock().await.recv().await.is_some()
}
