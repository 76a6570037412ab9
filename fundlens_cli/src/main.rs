mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "fundlens")]
#[command(about = "Serve and query FundLens campaign-finance data")]
struct Cli {
    /// Output format: table, markdown or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve(commands::serve::ServeArgs),
    /// Create or migrate the database schema
    InitDb(commands::db::DbArgs),
    /// Rebuild the summary tables from contributions
    RefreshViews(commands::db::DbArgs),
    /// List the largest contributors
    TopContributors(commands::top_contributors::TopContributorsArgs),
    /// Show the candidates and totals for one race
    Race(commands::race::RaceArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fundlens=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "markdown" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Serve(args) => commands::serve::run(args).await?,
        Commands::InitDb(args) => commands::db::init(args)?,
        Commands::RefreshViews(args) => commands::db::refresh(args, &format)?,
        Commands::TopContributors(args) => commands::top_contributors::run(args, &format)?,
        Commands::Race(args) => commands::race::run(args, &format)?,
    }

    Ok(())
}
