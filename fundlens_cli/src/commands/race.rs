//! The `race` subcommand: candidates and totals for one contest.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use fundlens_lib::validation::{validate_district, validate_state};
use fundlens_lib::{Db, Race, RaceQuery};

use crate::output::{print_json, print_race_markdown, print_race_table, OutputFormat};

#[derive(Args)]
pub struct RaceArgs {
    /// SQLite database path
    #[arg(long, default_value = "fundlens.db")]
    pub db: PathBuf,

    /// The presidential race
    #[arg(long, conflicts_with_all = ["state", "district"])]
    pub presidential: bool,

    /// State of a Senate race, or of a House race with --district
    #[arg(long)]
    pub state: Option<String>,

    /// House district within --state
    #[arg(long, requires = "state")]
    pub district: Option<String>,

    /// Leave out per-candidate totals
    #[arg(long)]
    pub no_stats: bool,
}

fn race_from_args(args: &RaceArgs) -> Result<Race> {
    if args.presidential {
        return Ok(Race::Presidential);
    }
    let Some(ref state) = args.state else {
        bail!("pass --presidential or --state");
    };
    let state = validate_state(state)?;
    Ok(match args.district {
        Some(ref district) => Race::House {
            state,
            district: validate_district(district)?,
        },
        None => Race::Senate { state },
    })
}

pub fn run(args: &RaceArgs, format: &OutputFormat) -> Result<()> {
    let race = race_from_args(args)?;
    let db = Db::open(&args.db)?;
    let Some(response) = db.race(&RaceQuery::new(race).with_stats(!args.no_stats))? else {
        bail!("no candidates found for that race");
    };

    match format {
        OutputFormat::Table => print_race_table(&response),
        OutputFormat::Markdown => print_race_markdown(&response),
        OutputFormat::Json => print_json(&response),
    }
    Ok(())
}
