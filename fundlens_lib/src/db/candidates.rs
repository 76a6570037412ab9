use std::collections::{BTreeMap, HashMap};

use rusqlite::{params, OptionalExtension, Row};

use fundlens_query::types::{CandidateDetail, CandidateList, CandidateStats, CandidateWithStats};
use fundlens_query::{CandidateQuery, Query};

use super::{Db, DbError};

/// Maps the seven list columns starting at `start`.
pub(super) fn candidate_list_from_row(row: &Row<'_>, start: usize) -> rusqlite::Result<CandidateList> {
    Ok(CandidateList {
        id: row.get(start)?,
        name: row.get(start + 1)?,
        office: row.get(start + 2)?,
        state: row.get(start + 3)?,
        district: row.get(start + 4)?,
        party: row.get(start + 5)?,
        is_active: row.get(start + 6)?,
    })
}

impl Db {
    /// One page of candidates and the total matching the filters. With stats
    /// included, a candidate without contributions gets zero stats.
    pub fn query_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<(Vec<CandidateWithStats>, i64), DbError> {
        let include_stats = query.include_stats;
        let items = self.query_rows(&query.select_statement(), |row| {
            let candidate = candidate_list_from_row(row, 0)?;
            let stats = if include_stats {
                let total_contributions: Option<i64> = row.get(7)?;
                Some(CandidateStats {
                    candidate_id: candidate.id,
                    total_contributions: total_contributions.unwrap_or(0),
                    total_amount: row.get::<_, Option<f64>>(8)?.unwrap_or(0.0),
                    unique_contributors: row.get::<_, Option<i64>>(9)?.unwrap_or(0),
                    avg_contribution: row.get::<_, Option<f64>>(10)?.unwrap_or(0.0),
                })
            } else {
                None
            };
            Ok(CandidateWithStats { candidate, stats })
        })?;
        let total = self.count(&query.count_statement())?;
        Ok((items, total))
    }

    pub fn get_candidate(&self, id: i64) -> Result<Option<CandidateDetail>, DbError> {
        self.conn
            .query_row(
                "SELECT id, name, office, state, district, party, is_active,
                        fec_candidate_id, state_candidate_id, created_at, updated_at
                 FROM candidate WHERE id = ?1",
                params![id],
                |row| {
                    Ok(CandidateDetail {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        office: row.get(2)?,
                        state: row.get(3)?,
                        district: row.get(4)?,
                        party: row.get(5)?,
                        is_active: row.get(6)?,
                        fec_candidate_id: row.get(7)?,
                        state_candidate_id: row.get(8)?,
                        created_at: row.get(9)?,
                        updated_at: row.get(10)?,
                    })
                },
            )
            .optional()
            .map_err(DbError::from)
    }

    /// Live fundraising stats. `None` when the candidate does not exist.
    pub fn candidate_stats(&self, id: i64) -> Result<Option<CandidateStats>, DbError> {
        if !self.exists("candidate", id)? {
            return Ok(None);
        }
        let mut stats = self.bulk_candidate_stats(&[id])?;
        Ok(stats.remove(&id))
    }

    /// Stats for every requested id; ids without contributions (or unknown
    /// ids) are zero-filled.
    pub fn bulk_candidate_stats(
        &self,
        ids: &[i64],
    ) -> Result<BTreeMap<i64, CandidateStats>, DbError> {
        let mut stats: BTreeMap<i64, CandidateStats> =
            ids.iter().map(|&id| (id, CandidateStats::zero(id))).collect();
        if ids.is_empty() {
            return Ok(stats);
        }
        let rows = self.query_rows(&CandidateQuery::stats_statement(ids), |row| {
            Ok(CandidateStats {
                candidate_id: row.get(0)?,
                total_contributions: row.get(1)?,
                total_amount: row.get(2)?,
                unique_contributors: row.get(3)?,
                avg_contribution: row.get(4)?,
            })
        })?;
        for row in rows {
            stats.insert(row.candidate_id, row);
        }
        Ok(stats)
    }

    /// Candidates in request order, skipping unknown ids.
    pub fn batch_candidate_details(
        &self,
        ids: &[i64],
        include_stats: bool,
    ) -> Result<Vec<CandidateWithStats>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut found: HashMap<i64, CandidateList> = HashMap::new();
        for id in ids {
            if found.contains_key(id) {
                continue;
            }
            if let Some(detail) = self.get_candidate(*id)? {
                found.insert(*id, CandidateList::from(&detail));
            }
        }
        let mut stats = if include_stats {
            let known: Vec<i64> = found.keys().copied().collect();
            self.bulk_candidate_stats(&known)?
        } else {
            BTreeMap::new()
        };

        Ok(ids
            .iter()
            .filter_map(|id| {
                found.get(id).map(|candidate| CandidateWithStats {
                    candidate: candidate.clone(),
                    stats: if include_stats {
                        stats.remove(id).or_else(|| Some(CandidateStats::zero(*id)))
                    } else {
                        None
                    },
                })
            })
            .collect())
    }

    /// Distinct states that have candidates, sorted.
    pub fn candidate_states(&self) -> Result<Vec<String>, DbError> {
        self.distinct_values("candidate", "state")
    }

    /// Candidates whose name matches `search`, for the unified search.
    pub fn search_candidates(
        &self,
        search: &str,
        page_size: i64,
    ) -> Result<(Vec<CandidateList>, i64), DbError> {
        let query = CandidateQuery::default()
            .with_search(search)
            .with_page_size(page_size);
        let (items, total) = self.query_candidates(&query)?;
        Ok((items.into_iter().map(|c| c.candidate).collect(), total))
    }
}
