//! CLI subcommand implementations.

pub mod db;
pub mod race;
pub mod serve;
pub mod top_contributors;
