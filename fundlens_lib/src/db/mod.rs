//! SQLite storage for FundLens: schema, summary-table refresh and the
//! read queries behind every API resource.
//!
//! Query text comes from the `fundlens_query` builders; this module binds
//! their parameters, runs them and maps rows into response types.

use std::path::Path;

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::Serialize;
use tracing::{debug, info};

use fundlens_query::sql::earmark_exclusion;
use fundlens_query::{SqlParam, SqlStatement};

mod candidates;
mod committees;
mod contributions;
mod contributors;
mod metadata;
mod races;

#[cfg(test)]
mod fixtures;

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct Db {
    conn: Connection,
}

/// Rows written per summary table by [`Db::refresh_materialized_views`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ViewRefreshReport {
    pub candidate_stats: usize,
    pub contributor_stats: usize,
    pub contributor_candidate_stats: usize,
    pub contributor_committee_stats: usize,
    pub refreshed_at: String,
}

const VIEWS_REFRESHED_AT: &str = "views_refreshed_at";

fn to_value(param: &SqlParam) -> Value {
    match param {
        SqlParam::Null => Value::Null,
        SqlParam::Integer(v) => Value::Integer(*v),
        SqlParam::Real(v) => Value::Real(*v),
        SqlParam::Text(v) => Value::Text(v.clone()),
    }
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Direct access to the connection, for loaders and tests.
    #[doc(hidden)]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn init(&self) -> Result<(), DbError> {
        // Columns added after the first release must exist before the DDL
        // below builds indexes over them.
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.migrate_v1()?;
            self.conn.pragma_update(None, "user_version", 1)?;
        }

        let schema = include_str!("../../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;

        Ok(())
    }

    /// v1 added earmark tracking and contributor match confidence.
    fn migrate_v1(&self) -> Result<(), DbError> {
        for sql in &[
            "ALTER TABLE contribution ADD COLUMN is_earmark_receipt INTEGER NOT NULL DEFAULT 0",
            "ALTER TABLE contributor ADD COLUMN match_confidence REAL",
        ] {
            match self.conn.execute(sql, []) {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(_, Some(ref msg)))
                    if msg.contains("duplicate column name") || msg.contains("no such table") => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<String>, DbError> {
        self.conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(DbError::from)
    }

    pub fn set_meta(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// When the summary tables were last rebuilt, if ever.
    pub fn views_refreshed_at(&self) -> Result<Option<String>, DbError> {
        self.get_meta(VIEWS_REFRESHED_AT)
    }

    /// Rebuild every `mv_*` summary table from `contribution` in one
    /// transaction. Earmark receipts and conduit rows are left out.
    pub fn refresh_materialized_views(&mut self) -> Result<ViewRefreshReport, DbError> {
        let filter = earmark_exclusion("x");
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM mv_candidate_stats", [])?;
        let candidate_stats = tx.execute(
            &format!(
                "INSERT INTO mv_candidate_stats
                   (candidate_id, total_contributions, total_amount, unique_contributors, avg_contribution)
                 SELECT x.recipient_candidate_id, COUNT(x.id), COALESCE(SUM(x.amount), 0),
                        COUNT(DISTINCT x.contributor_id), COALESCE(AVG(x.amount), 0)
                 FROM contribution x
                 WHERE x.recipient_candidate_id IS NOT NULL AND {}
                 GROUP BY x.recipient_candidate_id",
                filter
            ),
            [],
        )?;

        tx.execute("DELETE FROM mv_contributor_stats", [])?;
        let contributor_stats = tx.execute(
            &format!(
                "INSERT INTO mv_contributor_stats
                   (contributor_id, total_contributions, total_amount, unique_recipients,
                    avg_contribution, first_contribution_date, last_contribution_date)
                 SELECT x.contributor_id, COUNT(x.id), COALESCE(SUM(x.amount), 0),
                        COUNT(DISTINCT x.recipient_committee_id), COALESCE(AVG(x.amount), 0),
                        MIN(x.contribution_date), MAX(x.contribution_date)
                 FROM contribution x
                 WHERE {}
                 GROUP BY x.contributor_id",
                filter
            ),
            [],
        )?;

        tx.execute("DELETE FROM mv_contributor_candidate_stats", [])?;
        let contributor_candidate_stats = tx.execute(
            &format!(
                "INSERT INTO mv_contributor_candidate_stats
                   (contributor_id, candidate_id, contribution_count, total_amount,
                    first_contribution_date, last_contribution_date)
                 SELECT x.contributor_id, x.recipient_candidate_id, COUNT(x.id),
                        COALESCE(SUM(x.amount), 0), MIN(x.contribution_date), MAX(x.contribution_date)
                 FROM contribution x
                 WHERE x.recipient_candidate_id IS NOT NULL AND {}
                 GROUP BY x.contributor_id, x.recipient_candidate_id",
                filter
            ),
            [],
        )?;

        tx.execute("DELETE FROM mv_contributor_committee_stats", [])?;
        let contributor_committee_stats = tx.execute(
            &format!(
                "INSERT INTO mv_contributor_committee_stats
                   (contributor_id, committee_id, contribution_count, total_amount,
                    first_contribution_date, last_contribution_date)
                 SELECT x.contributor_id, x.recipient_committee_id, COUNT(x.id),
                        COALESCE(SUM(x.amount), 0), MIN(x.contribution_date), MAX(x.contribution_date)
                 FROM contribution x
                 WHERE {}
                 GROUP BY x.contributor_id, x.recipient_committee_id",
                filter
            ),
            [],
        )?;

        let refreshed_at = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![VIEWS_REFRESHED_AT, refreshed_at],
        )?;
        tx.commit()?;

        let report = ViewRefreshReport {
            candidate_stats,
            contributor_stats,
            contributor_candidate_stats,
            contributor_committee_stats,
            refreshed_at,
        };
        info!(
            candidate_stats = report.candidate_stats,
            contributor_stats = report.contributor_stats,
            contributor_candidate_stats = report.contributor_candidate_stats,
            contributor_committee_stats = report.contributor_committee_stats,
            "materialized views refreshed"
        );
        Ok(report)
    }

    /// Run a built statement and map every row.
    fn query_rows<T, F>(&self, stmt: &SqlStatement, f: F) -> Result<Vec<T>, DbError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "query");
        let values: Vec<Value> = stmt.params.iter().map(to_value).collect();
        let mut prepared = self.conn.prepare(&stmt.sql)?;
        let rows = prepared.query_map(params_from_iter(values.iter()), f)?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Run a built statement expected to produce at most one row.
    fn query_opt<T, F>(&self, stmt: &SqlStatement, f: F) -> Result<Option<T>, DbError>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "query");
        let values: Vec<Value> = stmt.params.iter().map(to_value).collect();
        self.conn
            .query_row(&stmt.sql, params_from_iter(values.iter()), f)
            .optional()
            .map_err(DbError::from)
    }

    /// Run a `SELECT COUNT(*)`-style statement.
    fn count(&self, stmt: &SqlStatement) -> Result<i64, DbError> {
        Ok(self.query_opt(stmt, |row| row.get(0))?.unwrap_or(0))
    }

    fn exists(&self, table: &str, id: i64) -> Result<bool, DbError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE id = ?1", table),
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}
