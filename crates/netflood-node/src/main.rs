use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use netflood_node::{Node, NodeConfig, NodeError};

#[derive(Parser)]
#[command(name = "netflood-node", about = "Best-effort network flooding node")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/netflood/config.toml")]
    config: PathBuf,

    /// Link address in `a.b` form, overriding the config file
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match NodeConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config from {}: {e}", cli.config.display());
            std::process::exit(1);
        }
    };
    if cli.address.is_some() {
        config.node.address = cli.address;
    }

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        netflood_node::logging::init_json(&config.logging.level);
    } else {
        netflood_node::logging::init(&config.logging.level);
    }

    let mut node = match Node::new(config) {
        Ok(node) => node,
        Err(e) => {
            tracing::error!("failed to create node: {e}");
            std::process::exit(1);
        }
    };

    let handle = node.shutdown_handle();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("received SIGINT, shutting down");
        handle.shutdown();
    });

    // Every stdin line becomes a flood
    let originate = node.originate_handle();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.is_empty() => {}
                Ok(Some(line)) => match originate.originate(line).await {
                    Ok(()) => {}
                    Err(NodeError::Stopped) => break,
                    Err(e) => tracing::warn!("line not flooded: {e}"),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("stdin read error: {e}");
                    break;
                }
            }
        }
    });

    if let Err(e) = node.start().await {
        tracing::error!("failed to start node: {e}");
        std::process::exit(1);
    }

    node.run().await;
    node.shutdown().await;
}
