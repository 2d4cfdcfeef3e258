//! geosocial binary
//!
//! Loads a graph snapshot, runs one community search and prints the
//! exported tree and user sets as JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! geosocial --config geosocial.yaml --graph graph.json --user alice
//!
//! # With environment variables only
//! GEOSOCIAL_QUERY__MAX_HOPS=3 geosocial --graph graph.json --user alice --mode distance
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use geosocial_domain::{CommunitySearch, SearchRequest, UserId};
use geosocial_server::observability::{init_logging, LoggingConfig};
use geosocial_server::{QueryHandler, ServerConfig};
use geosocial_storage::{GraphSnapshot, MemoryGraphStore};

/// Bounded-hop community search over a keyword-attributed social graph
#[derive(Parser, Debug)]
#[command(name = "geosocial")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,

    /// Path to a graph snapshot (JSON)
    #[arg(short, long)]
    graph: String,

    /// Query user id
    #[arg(short, long)]
    user: String,

    /// Query mode, overrides `query.mode`
    #[arg(short, long)]
    mode: Option<String>,

    /// Hop limit, overrides `query.max_hops`
    #[arg(long)]
    max_hops: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = if let Some(config_path) = &args.config {
        ServerConfig::load(config_path)?
    } else {
        ServerConfig::from_env()?
    };
    if let Some(mode) = args.mode {
        config.query.mode = mode;
    }
    if let Some(max_hops) = args.max_hops {
        config.query.max_hops = max_hops;
    }
    config.validate()?;

    init_logging(LoggingConfig::from_settings(&config.logging));

    info!(version = env!("CARGO_PKG_VERSION"), graph = %args.graph, "starting geosocial");

    let json = std::fs::read_to_string(&args.graph)
        .with_context(|| format!("failed to read graph snapshot {}", args.graph))?;
    let snapshot = GraphSnapshot::from_json(&json)?;
    let store = MemoryGraphStore::from_snapshot(&snapshot)?;

    let engine = CommunitySearch::with_config(Arc::new(store), config.search_config()?);
    let handler = QueryHandler::new(Arc::new(engine));

    let request = SearchRequest::new(UserId::new(args.user)?, config.query_params()?);
    let result = handler.query(request.clone()).await?;

    println!("{}", result.export(&request).to_json_pretty()?);
    Ok(())
}
