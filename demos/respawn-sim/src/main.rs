//! Respawn simulator.
//!
//! Feeds host events to a grace service from stdin, one JSON object per
//! line, and prints the verdicts and chat notices that come back.
//!
//! ```text
//! {"type":"respawn","player":1}
//! wait 2
//! {"type":"damage","victim":{"player":1},"attacker":"other"}
//! {"type":"block_place","player":1}
//! ```
//!
//! A `wait <secs>` line pauses the feed so grace periods can expire.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use respite::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Drive a grace service from a stream of JSON host events
#[derive(Parser, Debug)]
#[command(name = "respawn-sim")]
#[command(about = "Replay host events against a grace service", long_about = None)]
struct Args {
    /// YAML config file (created with defaults if missing)
    #[arg(short, long, default_value = "config.yml")]
    config: PathBuf,

    /// Override the grace duration in seconds
    #[arg(short, long)]
    duration: Option<u64>,

    /// Print notices as JSON instead of chat text
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if GraceConfig::save_default(&args.config)? {
        tracing::info!(path = %args.config.display(), "wrote default config");
    }
    let mut config = GraceConfig::load_or_default(&args.config);
    if let Some(secs) = args.duration {
        config.duration_secs = secs.max(1);
    }

    let (grace, mut notices) = RespiteBuilder::new().config(config).spawn();

    let json = args.json;
    let printer = tokio::spawn(async move {
        while let Some(notice) = notices.recv().await {
            if json {
                match serde_json::to_string(&notice) {
                    Ok(line) => println!("{line}"),
                    Err(e) => tracing::warn!(error = %e, "unprintable notice"),
                }
            } else {
                println!("{} <- {notice}", notice.player);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(secs) = line.strip_prefix("wait ") {
            match parse_wait(secs) {
                Ok(pause) => tokio::time::sleep(pause).await,
                Err(error) => tracing::warn!(line, %error, "bad wait directive"),
            }
            continue;
        }

        let event = match JsonCodec.decode_event(line.as_bytes()) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, line, "skipping malformed event");
                continue;
            }
        };
        let is_damage = matches!(event, HostEvent::Damage { .. });
        let verdict = grace.dispatch(event).await?;
        if is_damage {
            println!("damage -> {verdict:?}");
        }
    }

    let ended = grace.shutdown().await?;
    tracing::info!(ended, "input finished");
    drop(grace);
    printer.await?;
    Ok(())
}

/// Parses the argument of a `wait <secs>` line.
fn parse_wait(secs: &str) -> Result<Duration, String> {
    let secs: f64 = secs.trim().parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}
