//! The `top-contributors` subcommand.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use fundlens_lib::validation::{normalize_code, validate_range, validate_state};
use fundlens_lib::{Db, TopContributorsQuery};

use crate::output::{print_json, print_top_contributors_markdown, print_top_contributors_table, OutputFormat};

#[derive(Args)]
pub struct TopContributorsArgs {
    /// SQLite database path
    #[arg(long, default_value = "fundlens.db")]
    pub db: PathBuf,

    /// Number of contributors to list (1-1000)
    #[arg(long, default_value = "10")]
    pub limit: i64,

    /// Two-letter state code
    #[arg(long)]
    pub state: Option<String>,

    /// Entity type code (IND, PAC, ORG, ...)
    #[arg(long)]
    pub entity_type: Option<String>,
}

pub fn run(args: &TopContributorsArgs, format: &OutputFormat) -> Result<()> {
    let limit = validate_range("limit", args.limit, 1, 1000)?;
    let mut query = TopContributorsQuery::default().with_limit(limit);
    if let Some(ref state) = args.state {
        query = query.with_state(&validate_state(state)?);
    }
    if let Some(ref entity_type) = args.entity_type {
        query = query.with_entity_type(&normalize_code(entity_type));
    }

    let db = Db::open(&args.db)?;
    let (contributors, total) = db.top_contributors(&query)?;
    eprintln!("{} of {} contributors", contributors.len(), total);

    match format {
        OutputFormat::Table => print_top_contributors_table(&contributors),
        OutputFormat::Markdown => print_top_contributors_markdown(&contributors),
        OutputFormat::Json => print_json(&contributors),
    }
    Ok(())
}
