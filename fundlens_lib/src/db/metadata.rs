//! Distinct code lists behind the `/metadata` and `/.../states` routes.

use super::{Db, DbError};

impl Db {
    /// Distinct non-null, non-empty values of `table.column`, sorted.
    /// Only called with the crate's own table and column names.
    pub(super) fn distinct_values(&self, table: &str, column: &str) -> Result<Vec<String>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT {column} FROM {table}
             WHERE {column} IS NOT NULL AND {column} != ''
             ORDER BY {column}"
        ))?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    pub fn contributor_states(&self) -> Result<Vec<String>, DbError> {
        self.distinct_values("contributor", "state")
    }

    pub fn contributor_entity_types(&self) -> Result<Vec<String>, DbError> {
        self.distinct_values("contributor", "entity_type")
    }

    pub fn committee_states(&self) -> Result<Vec<String>, DbError> {
        self.distinct_values("committee", "state")
    }

    pub fn committee_types(&self) -> Result<Vec<String>, DbError> {
        self.distinct_values("committee", "committee_type")
    }

    pub fn candidate_offices(&self) -> Result<Vec<String>, DbError> {
        self.distinct_values("candidate", "office")
    }

    /// States seen on any candidate, committee or contributor.
    pub fn all_states(&self) -> Result<Vec<String>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT state FROM candidate WHERE state IS NOT NULL AND state != ''
             UNION
             SELECT state FROM committee WHERE state IS NOT NULL AND state != ''
             UNION
             SELECT state FROM contributor WHERE state IS NOT NULL AND state != ''
             ORDER BY 1",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}
