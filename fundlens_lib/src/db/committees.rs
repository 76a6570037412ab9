use rusqlite::{params, OptionalExtension, Row};

use fundlens_query::types::{CommitteeDetail, CommitteeList, CommitteeStats, CommitteeWithStats};
use fundlens_query::{CommitteeQuery, Query};

use super::{Db, DbError};

const COMMITTEE_LIST_SQL: &str = "SELECT id, name, committee_type, party, state, city, \
     is_active, candidate_id FROM committee";

fn committee_list_from_row(row: &Row<'_>) -> rusqlite::Result<CommitteeList> {
    Ok(CommitteeList {
        id: row.get(0)?,
        name: row.get(1)?,
        committee_type: row.get(2)?,
        party: row.get(3)?,
        state: row.get(4)?,
        city: row.get(5)?,
        is_active: row.get(6)?,
        candidate_id: row.get(7)?,
    })
}

impl Db {
    /// One page of committees and the filtered total. Stats stay `None` for
    /// committees that never received a contribution.
    pub fn query_committees(
        &self,
        query: &CommitteeQuery,
    ) -> Result<(Vec<CommitteeWithStats>, i64), DbError> {
        let items = self.query_rows(&query.select_statement(), |row| {
            let committee = committee_list_from_row(row)?;
            let received: Option<i64> = row.get(8)?;
            let stats = match received {
                Some(total_contributions_received) => Some(CommitteeStats {
                    committee_id: committee.id,
                    total_contributions_received,
                    total_amount_received: row.get(9)?,
                    unique_contributors: row.get(10)?,
                    avg_contribution: row.get(11)?,
                }),
                None => None,
            };
            Ok(CommitteeWithStats { committee, stats })
        })?;
        let total = self.count(&query.count_statement())?;
        Ok((items, total))
    }

    pub fn get_committee(
        &self,
        id: i64,
        include_candidate: bool,
    ) -> Result<Option<CommitteeDetail>, DbError> {
        let detail = self
            .conn
            .query_row(
                "SELECT id, name, committee_type, party, state, city, is_active, candidate_id,
                        fec_committee_id, state_committee_id, created_at, updated_at
                 FROM committee WHERE id = ?1",
                params![id],
                |row| {
                    Ok(CommitteeDetail {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        committee_type: row.get(2)?,
                        party: row.get(3)?,
                        state: row.get(4)?,
                        city: row.get(5)?,
                        is_active: row.get(6)?,
                        candidate_id: row.get(7)?,
                        fec_committee_id: row.get(8)?,
                        state_committee_id: row.get(9)?,
                        created_at: row.get(10)?,
                        updated_at: row.get(11)?,
                        candidate: None,
                    })
                },
            )
            .optional()?;

        let Some(mut detail) = detail else {
            return Ok(None);
        };
        if include_candidate {
            if let Some(candidate_id) = detail.candidate_id {
                detail.candidate = self.get_candidate(candidate_id)?.as_ref().map(Into::into);
            }
        }
        Ok(Some(detail))
    }

    /// Live received-contribution stats. `None` when the committee does not exist.
    pub fn committee_stats(&self, id: i64) -> Result<Option<CommitteeStats>, DbError> {
        if !self.exists("committee", id)? {
            return Ok(None);
        }
        self.query_opt(&CommitteeQuery::stats_statement(id), |row| {
            Ok(CommitteeStats {
                committee_id: id,
                total_contributions_received: row.get(0)?,
                total_amount_received: row.get(1)?,
                unique_contributors: row.get(2)?,
                avg_contribution: row.get(3)?,
            })
        })
    }

    pub fn committees_by_candidate(&self, candidate_id: i64) -> Result<Vec<CommitteeList>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE candidate_id = ?1 ORDER BY name", COMMITTEE_LIST_SQL))?;
        let rows = stmt.query_map(params![candidate_id], committee_list_from_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    pub fn committees_by_state(&self, state: &str) -> Result<Vec<CommitteeList>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE state = ?1 ORDER BY name", COMMITTEE_LIST_SQL))?;
        let rows = stmt.query_map(params![state], committee_list_from_row)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    /// Committees whose name matches `search`, for the unified search.
    pub fn search_committees(
        &self,
        search: &str,
        page_size: i64,
    ) -> Result<(Vec<CommitteeList>, i64), DbError> {
        let query = CommitteeQuery::default()
            .with_search(search)
            .with_page_size(page_size);
        let (items, total) = self.query_committees(&query)?;
        Ok((items.into_iter().map(|c| c.committee).collect(), total))
    }
}
