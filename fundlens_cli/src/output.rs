use fundlens_lib::types::{RaceResponse, TopContributor};
use fundlens_lib::ViewRefreshReport;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Markdown,
}

#[derive(Tabled)]
struct TopContributorRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    entity_type: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Contributions")]
    contributions: i64,
    #[tabled(rename = "Recipients")]
    recipients: i64,
}

#[derive(Tabled)]
struct RaceCandidateRow {
    #[tabled(rename = "Candidate")]
    name: String,
    #[tabled(rename = "Party")]
    party: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Raised")]
    raised: String,
    #[tabled(rename = "Contributions")]
    contributions: i64,
    #[tabled(rename = "Contributors")]
    contributors: i64,
}

#[derive(Tabled)]
struct RefreshRow {
    #[tabled(rename = "Table")]
    table: &'static str,
    #[tabled(rename = "Rows")]
    rows: usize,
}

// -- Row builders --

fn build_top_contributor_rows(contributors: &[TopContributor]) -> Vec<TopContributorRow> {
    contributors
        .iter()
        .map(|t| TopContributorRow {
            name: t.contributor.name.clone(),
            entity_type: t.contributor.entity_type.clone(),
            location: format_location(t.contributor.city.as_deref(), t.contributor.state.as_deref()),
            total: format_amount(t.total_amount),
            contributions: t.contribution_count,
            recipients: t.unique_recipients,
        })
        .collect()
}

fn build_race_rows(race: &RaceResponse) -> Vec<RaceCandidateRow> {
    race.candidates
        .iter()
        .map(|c| {
            let (raised, contributions, contributors) = match c.stats {
                Some(ref s) => (
                    format_amount(s.total_amount),
                    s.total_contributions,
                    s.unique_contributors,
                ),
                None => ("-".to_string(), 0, 0),
            };
            RaceCandidateRow {
                name: c.name.clone(),
                party: c.party.clone().unwrap_or_default(),
                active: if c.is_active { "yes" } else { "no" }.to_string(),
                raised,
                contributions,
                contributors,
            }
        })
        .collect()
}

fn build_refresh_rows(report: &ViewRefreshReport) -> Vec<RefreshRow> {
    vec![
        RefreshRow {
            table: "mv_candidate_stats",
            rows: report.candidate_stats,
        },
        RefreshRow {
            table: "mv_contributor_stats",
            rows: report.contributor_stats,
        },
        RefreshRow {
            table: "mv_contributor_candidate_stats",
            rows: report.contributor_candidate_stats,
        },
        RefreshRow {
            table: "mv_contributor_committee_stats",
            rows: report.contributor_committee_stats,
        },
    ]
}

fn race_title(race: &RaceResponse) -> String {
    let mut title = match race.office.as_str() {
        "P" => "Presidential".to_string(),
        "S" => "Senate".to_string(),
        "H" => "House".to_string(),
        other => other.to_string(),
    };
    if let Some(ref state) = race.state {
        title.push_str(&format!(" {state}"));
    }
    if let Some(ref district) = race.district {
        title.push_str(&format!("-{district}"));
    }
    format!(
        "{title}: {} candidates ({} active), {} raised",
        race.summary.total_candidates,
        race.summary.active_candidates,
        format_amount(race.summary.total_amount_raised)
    )
}

// -- Table output --

pub fn print_top_contributors_table(contributors: &[TopContributor]) {
    println!("{}", Table::new(build_top_contributor_rows(contributors)));
}

pub fn print_race_table(race: &RaceResponse) {
    println!("{}", race_title(race));
    println!("{}", Table::new(build_race_rows(race)));
}

pub fn print_refresh_table(report: &ViewRefreshReport) {
    println!("{}", Table::new(build_refresh_rows(report)));
    println!("Refreshed at {}", report.refreshed_at);
}

// -- Markdown output --

pub fn print_top_contributors_markdown(contributors: &[TopContributor]) {
    let mut table = Table::new(build_top_contributor_rows(contributors));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_race_markdown(race: &RaceResponse) {
    let mut table = Table::new(build_race_rows(race));
    table.with(Style::markdown());
    println!("**{}**\n\n{}", race_title(race), table);
}

pub fn print_refresh_markdown(report: &ViewRefreshReport) {
    let mut table = Table::new(build_refresh_rows(report));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- JSON output --

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_location(city: Option<&str>, state: Option<&str>) -> String {
    match (city, state) {
        (Some(city), Some(state)) => format!("{city}, {state}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => String::new(),
    }
}

fn format_amount(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${:.2}", value)
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
