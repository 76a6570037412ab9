//! The `serve` subcommand: load configuration and run the HTTP API.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fundlens_lib::api::{self, AppState};
use fundlens_lib::{Config, Db};
use tracing::{info, warn};

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file, applied before environment variables
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Rebuild the summary tables before accepting requests
    #[arg(long)]
    pub refresh_views: bool,
}

pub async fn run(args: &ServeArgs) -> Result<()> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(ref host) = args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let mut db = Db::open(&config.database_path)
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    db.init()?;

    if args.refresh_views {
        let report = db.refresh_materialized_views()?;
        info!(
            candidates = report.candidate_stats,
            contributors = report.contributor_stats,
            "Summary tables refreshed"
        );
    } else if db.views_refreshed_at()?.is_none() {
        warn!("Summary tables have never been refreshed; run `fundlens refresh-views`");
    }

    info!(
        "Starting {} {} with database {}",
        config.app_name,
        config.app_version,
        config.database_path.display()
    );
    api::serve(AppState::new(db, config)).await?;
    Ok(())
}
