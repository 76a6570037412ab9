//! The `init-db` and `refresh-views` subcommands.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use fundlens_lib::Db;

use crate::output::{print_json, print_refresh_markdown, print_refresh_table, OutputFormat};

#[derive(Args)]
pub struct DbArgs {
    /// SQLite database path
    #[arg(long, default_value = "fundlens.db")]
    pub db: PathBuf,
}

pub fn init(args: &DbArgs) -> Result<()> {
    let db = Db::open(&args.db)?;
    db.init()?;
    eprintln!("Schema ready in {}", args.db.display());
    Ok(())
}

pub fn refresh(args: &DbArgs, format: &OutputFormat) -> Result<()> {
    let mut db = Db::open(&args.db)?;
    db.init()?;
    let report = db.refresh_materialized_views()?;

    match format {
        OutputFormat::Table => print_refresh_table(&report),
        OutputFormat::Markdown => print_refresh_markdown(&report),
        OutputFormat::Json => print_json(&report),
    }
    Ok(())
}
