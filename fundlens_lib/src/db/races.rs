use fundlens_query::types::{
    CandidateStats, OfficeRaceSummary, RaceCandidate, RaceResponse, RaceSummary, StateSummary,
};
use fundlens_query::{Race, RaceQuery, StateSummaryQuery};

use super::candidates::candidate_list_from_row;
use super::{Db, DbError};

impl Db {
    /// Candidates and fundraising for one race, from the summary tables.
    ///
    /// Senate and House races with no candidates are `None`; the
    /// presidential race always answers.
    pub fn race(&self, query: &RaceQuery) -> Result<Option<RaceResponse>, DbError> {
        let include_stats = query.include_stats;
        let candidates = self.query_rows(&query.candidates_statement(), |row| {
            let id: i64 = row.get(0)?;
            let stats = if include_stats {
                let total_contributions: Option<i64> = row.get(4)?;
                Some(match total_contributions {
                    Some(total_contributions) => CandidateStats {
                        candidate_id: id,
                        total_contributions,
                        total_amount: row.get(5)?,
                        unique_contributors: row.get(6)?,
                        avg_contribution: row.get(7)?,
                    },
                    None => CandidateStats::zero(id),
                })
            } else {
                None
            };
            Ok(RaceCandidate {
                id,
                name: row.get(1)?,
                party: row.get(2)?,
                is_active: row.get(3)?,
                stats,
            })
        })?;

        if candidates.is_empty() && query.race != Race::Presidential {
            return Ok(None);
        }

        let summary = self
            .query_opt(&query.summary_statement(), |row| {
                Ok(RaceSummary {
                    total_candidates: row.get(0)?,
                    active_candidates: row.get(1)?,
                    total_amount_raised: row.get(2)?,
                    total_contributions: row.get(3)?,
                    unique_contributors: row.get(4)?,
                })
            })?
            .unwrap_or_else(RaceSummary::empty);

        let (state, district) = match &query.race {
            Race::Presidential => (None, None),
            Race::Senate { state } => (Some(state.clone()), None),
            Race::House { state, district } => (Some(state.clone()), Some(district.clone())),
        };
        Ok(Some(RaceResponse {
            state,
            district,
            office: query.race.office().to_string(),
            summary,
            candidates,
        }))
    }

    /// Per-office roll-up of a state's candidates. `None` when the state has none.
    pub fn state_summary(&self, query: &StateSummaryQuery) -> Result<Option<StateSummary>, DbError> {
        let totals = self.query_opt(&query.totals_statement(), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;
        let Some((total_candidates, active_candidates, total_raised, total_contributions, unique_contributors)) =
            totals.filter(|t| t.0 > 0)
        else {
            return Ok(None);
        };

        let offices = self.query_rows(&query.offices_statement(), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, f64>(3)?,
            ))
        })?;

        let mut races = Vec::with_capacity(offices.len());
        for (office, candidate_count, active_candidate_count, office_raised) in offices {
            let districts = if office == "H" {
                Some(self.query_rows(&query.districts_statement(&office), |row| row.get(0))?)
            } else {
                None
            };
            let top_fundraisers = self.query_rows(&query.top_fundraisers_statement(&office), |row| {
                candidate_list_from_row(row, 0)
            })?;
            races.push(OfficeRaceSummary {
                office,
                districts,
                candidate_count,
                active_candidate_count,
                total_raised: office_raised,
                top_fundraisers,
            });
        }

        Ok(Some(StateSummary {
            state: query.state.clone(),
            total_candidates,
            active_candidates,
            total_raised,
            total_contributions,
            unique_contributors,
            races,
        }))
    }
}
