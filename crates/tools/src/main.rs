use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "festmap", about = "Authoring tools for the festival map")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Generate one HTML page per booth block of a description source file.
    Booths {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Check an event data document.
    Validate {
        path: PathBuf,
        /// Fail on duplicate ids, dangling group members and missing content files.
        #[arg(long)]
        strict: bool,
        /// Directory the items' content files are served from.
        #[arg(long)]
        content_dir: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    match Cli::parse().command {
        Cmd::Booths { input, out } => cmd_booths(input, out),
        Cmd::Validate {
            path,
            strict,
            content_dir,
        } => cmd_validate(path, strict, content_dir),
    }
}

fn cmd_booths(input: PathBuf, out: PathBuf) -> Result<(), String> {
    let pages = tools::generate_booth_pages(&input, &out)?;
    if pages.written.is_empty() {
        warn!("no <start> ... <end> blocks found in {input:?}");
    }
    for id in &pages.duplicate_ids {
        warn!("booth {id} is defined more than once; the last block wins");
    }
    for path in &pages.written {
        info!("wrote {}", path.display());
    }
    println!("{} booth pages written to {}", pages.written.len(), out.display());
    Ok(())
}

fn cmd_validate(path: PathBuf, strict: bool, content_dir: Option<PathBuf>) -> Result<(), String> {
    let summary = tools::validate_event_file(&path, strict, content_dir.as_deref())?;
    for finding in &summary.findings {
        warn!("{finding}");
    }
    for file in &summary.missing_content {
        warn!("missing content file {file}");
    }
    match summary.bounds {
        Some(b) => {
            let c = b.center();
            info!("items centered at {:.5}, {:.5}", c.lat, c.lng);
        }
        None => warn!("no item has a usable coordinate"),
    }
    let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
