use rusqlite::Row;

use fundlens_query::types::{ContributionList, ContributionSummary, ContributionWithRelations};
use fundlens_query::ContributionQuery;

use super::{Db, DbError};

fn contribution_list_from_row(row: &Row<'_>) -> rusqlite::Result<ContributionList> {
    Ok(ContributionList {
        id: row.get(0)?,
        contribution_date: row.get(1)?,
        amount: row.get(2)?,
        contribution_type: row.get(3)?,
        election_type: row.get(4)?,
        election_year: row.get(5)?,
        election_cycle: row.get(6)?,
        contributor_id: row.get(7)?,
        recipient_committee_id: row.get(8)?,
        recipient_candidate_id: row.get(9)?,
        source_system: row.get(10)?,
    })
}

impl Db {
    pub fn query_contributions(
        &self,
        query: &ContributionQuery,
    ) -> Result<(Vec<ContributionList>, i64), DbError> {
        let items = self.query_rows(&query.select_statement(), contribution_list_from_row)?;
        let total = self.count(&query.count_statement())?;
        Ok((items, total))
    }

    pub fn get_contribution(&self, id: i64) -> Result<Option<ContributionWithRelations>, DbError> {
        self.query_opt(&ContributionQuery::detail_statement(id), |row| {
            Ok(ContributionWithRelations {
                contribution: contribution_list_from_row(row)?,
                source_transaction_id: row.get(11)?,
                memo_text: row.get(12)?,
                created_at: row.get(13)?,
                updated_at: row.get(14)?,
                contributor_name: row.get(15)?,
                contributor_city: row.get(16)?,
                contributor_state: row.get(17)?,
                committee_name: row.get(18)?,
                committee_type: row.get(19)?,
                candidate_name: row.get(20)?,
                candidate_office: row.get(21)?,
                candidate_state: row.get(22)?,
            })
        })
    }

    /// Totals over every contribution matching the filters; pagination is ignored.
    pub fn contribution_summary(
        &self,
        query: &ContributionQuery,
    ) -> Result<ContributionSummary, DbError> {
        let summary = self.query_opt(&query.summary_statement(), |row| {
            Ok(ContributionSummary {
                total_contributions: row.get(0)?,
                total_amount: row.get(1)?,
                avg_contribution: row.get(2)?,
                min_contribution: row.get(3)?,
                max_contribution: row.get(4)?,
            })
        })?;
        Ok(summary.unwrap_or(ContributionSummary {
            total_contributions: 0,
            total_amount: 0.0,
            avg_contribution: 0.0,
            min_contribution: 0.0,
            max_contribution: 0.0,
        }))
    }
}
