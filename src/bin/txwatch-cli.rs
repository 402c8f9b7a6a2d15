use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::TxHash;
use clap::Parser;

use txwatch::config::{load_config, MonitorConfig};
use txwatch::observability::logging;
use txwatch::{RpcReader, TxMonitor, TxStatus, WatchRegistry, WatchRequest};

#[derive(Parser)]
#[command(name = "txwatch-cli")]
#[command(about = "Watch an Ethereum transaction until it is confirmed", long_about = None)]
struct Cli {
    /// Transaction hash to watch (0x-prefixed).
    tx_hash: String,

    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint (overrides config).
    #[arg(long)]
    rpc_url: Option<String>,

    /// Required confirmation depth (overrides config).
    #[arg(long)]
    depth: Option<u64>,

    /// Polling interval in milliseconds (overrides config).
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Watch deadline in seconds (overrides config).
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Emit status messages as JSON lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => MonitorConfig::default(),
    };
    if let Some(url) = cli.rpc_url {
        config.rpc.rpc_url = url;
    }
    if let Some(depth) = cli.depth {
        config.watch.confirmation_depth = depth;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.watch.poll_interval_ms = interval_ms;
    }
    if let Some(deadline_secs) = cli.deadline_secs {
        config.watch.deadline_secs = deadline_secs;
    }

    logging::init(&config.observability.log_level);

    let tx_hash: TxHash = cli.tx_hash.parse()?;

    let reader = Arc::new(RpcReader::new(config.rpc.clone()).await?);
    let registry = Arc::new(WatchRegistry::new());
    let monitor = TxMonitor::new(reader, registry);

    let mut request = WatchRequest::new(tx_hash);
    request.required_depth = config.watch.confirmation_depth;
    request.poll_interval = Duration::from_millis(config.watch.poll_interval_ms);
    request.deadline = Duration::from_secs(config.watch.deadline_secs);

    let mut handle = monitor.watch(request);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Interrupted, cancelling watch");
                handle.cancel();
            }
            msg = handle.recv() => {
                let Some(msg) = msg else {
                    // Channel closed without a terminal message.
                    std::process::exit(1);
                };
                if cli.json {
                    println!("{}", serde_json::to_string(&msg)?);
                } else {
                    match &msg.error {
                        Some(detail) => println!("{}  {}  ({})", msg.tx_hash, msg.status, detail),
                        None => println!("{}  {}", msg.tx_hash, msg.status),
                    }
                }
                if msg.status == TxStatus::Confirmed {
                    return Ok(());
                }
                if msg.status.is_terminal() || msg.error.is_some() {
                    std::process::exit(1);
                }
            }
        }
    }
}
