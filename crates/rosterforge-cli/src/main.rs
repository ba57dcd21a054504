//! Rosterforge: normalize an upstream game-data export into a display-ready
//! JSON envelope.

mod fetch;
mod pipeline;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rosterforge", version, about)]
struct Args {
    /// Upstream data export URL.
    #[arg(
        long,
        default_value = "https://raw.communitydragon.org/latest/cdragon/tft/en_us.json"
    )]
    source_url: String,

    /// Patch version list URL (first element = latest).
    #[arg(
        long,
        default_value = "https://ddragon.leagueoflegends.com/api/versions.json"
    )]
    versions_url: String,

    /// Read the snapshot from a local file instead of fetching.
    #[arg(long)]
    offline: Option<PathBuf>,

    /// Patch label for provenance, overriding the versions lookup. Offline
    /// runs skip that lookup, so this is how they keep a patch recorded.
    #[arg(long)]
    patch: Option<String>,

    /// Output file (stdout when omitted).
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Pretty-print the JSON envelope.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let (snapshot, versions) = if let Some(path) = &args.offline {
        (Some(read_snapshot(path)?), None)
    } else {
        let client = fetch::build_client()?;
        (
            fetch::fetch_json(&client, &args.source_url),
            fetch::fetch_json(&client, &args.versions_url),
        )
    };

    let envelope = pipeline::run(snapshot, versions, args.patch)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };

    match &args.out {
        Some(path) => {
            fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
            println!(
                "{} {} ({} champions, {} traits, {} items, {} augments)",
                "wrote".green().bold(),
                path.display(),
                envelope.champions.len(),
                envelope.traits.len(),
                envelope.items.len(),
                envelope.augments.len(),
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
