//! vodsite command-line entry point.
//!
//! Builds the route cache against the configured document store and emits
//! either the pre-render route list or the video sitemap XML. Logging goes
//! to stderr so stdout stays clean for the emitted artifact.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vodsite_client::{FirestoreClient, FirestoreConfig};
use vodsite_core::{AppConfig, RouteCache, sitemap};

#[derive(Parser)]
#[command(name = "vodsite", version, about = "Route and sitemap generation for the video catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every pre-render route path, one per line.
    Routes,
    /// Render the video sitemap XML.
    Sitemap {
        /// Write the document to a file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let store = FirestoreClient::new(FirestoreConfig::from_app_config(&config)?)?;
    let cache = RouteCache::new(Arc::new(store), config.page_size);

    match cli.command {
        Command::Routes => {
            for route in cache.route_list().await? {
                println!("{route}");
            }
        }
        Command::Sitemap { output } => {
            let base_url = config.require_site_base_url()?.to_string();
            let entries = cache.sitemap_entries(&config.sitemap()).await?;
            let xml = sitemap::xml::render(&entries, &base_url);

            match output {
                Some(path) => {
                    std::fs::write(&path, &xml)
                        .with_context(|| format!("failed to write sitemap to {}", path.display()))?;
                    tracing::info!(path = %path.display(), entries = entries.len(), "sitemap written");
                }
                None => print!("{xml}"),
            }
        }
    }

    Ok(())
}
