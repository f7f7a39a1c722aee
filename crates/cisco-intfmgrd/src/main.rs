//! intfmgrd entry point.
//!
//! Reads a reconciliation request and prints the IOS commands that would
//! bring the interface to its desired state. No device is contacted; every
//! command is sent to a dry-run channel.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use cisco_intfmgrd::{Interface, InterfaceRequest, UpdateReport};
use netdev_cfgmgr_common::{DryRunChannel, TracingErrorSink};

/// Cisco IOS interface reconciliation
#[derive(Parser, Debug)]
#[command(name = "intfmgrd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML file with the interface name, current and desired properties
    #[arg(short = 'r', long)]
    request: PathBuf,

    /// Interface name (overrides the one in the request)
    #[arg(short = 'i', long)]
    interface: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: Level,
}

/// Initialize tracing/logging.
fn init_logging(level: Level) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

async fn run(args: &Args) -> anyhow::Result<UpdateReport> {
    let doc = std::fs::read_to_string(&args.request)
        .with_context(|| format!("Failed to read {}", args.request.display()))?;
    let request = InterfaceRequest::from_yaml(&doc)
        .with_context(|| format!("Failed to parse {}", args.request.display()))?;
    let name = request.interface_name(args.interface.as_deref())?;

    let mut channel = DryRunChannel::new();
    let sink = TracingErrorSink;
    let report = Interface::new(name, &mut channel, &sink)
        .update(&request.current, &request.desired)
        .await?;

    for cmd in channel.sent() {
        println!("{}", cmd);
    }
    Ok(report)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(args.log_level) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&args).await {
        Ok(report) if report.is_success() => {
            info!("{} changes applied", report.outcomes.len());
            ExitCode::SUCCESS
        }
        Ok(report) => {
            error!("Failed properties: {:?}", report.failed());
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("intfmgrd error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
