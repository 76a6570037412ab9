use std::collections::HashMap;

use rusqlite::{params, OptionalExtension, Row};

use fundlens_query::types::{
    CandidateSummary, CommitteeSummary, ContributionSimple, ContributionWithCommittee,
    ContributorDetail, ContributorList, ContributorRecipient, ContributorSearchAggregated,
    ContributorStats, ContributorWithAggregates, ContributorsSummary, PaginationMeta,
    RecipientContributors, RecipientSummary, TopContributor,
};
use fundlens_query::{
    contributor_stats_statement, ContributorContributionsQuery, ContributorQuery,
    ContributorRecipientsQuery, ContributorSearchQuery, Query, Recipient,
    RecipientContributorsQuery, TopContributorsQuery,
};

use super::{Db, DbError};

/// Maps the ten contributor columns starting at `start`.
fn contributor_list_from_row(row: &Row<'_>, start: usize) -> rusqlite::Result<ContributorList> {
    Ok(ContributorList {
        id: row.get(start)?,
        name: row.get(start + 1)?,
        first_name: row.get(start + 2)?,
        last_name: row.get(start + 3)?,
        city: row.get(start + 4)?,
        state: row.get(start + 5)?,
        zip: row.get(start + 6)?,
        entity_type: row.get(start + 7)?,
        employer: row.get(start + 8)?,
        occupation: row.get(start + 9)?,
    })
}

impl Db {
    pub fn query_contributors(
        &self,
        query: &ContributorQuery,
    ) -> Result<(Vec<ContributorList>, i64), DbError> {
        let items = self.query_rows(&query.select_statement(), |row| {
            contributor_list_from_row(row, 0)
        })?;
        let total = self.count(&query.count_statement())?;
        Ok((items, total))
    }

    pub fn get_contributor(&self, id: i64) -> Result<Option<ContributorDetail>, DbError> {
        self.conn
            .query_row(
                "SELECT id, name, first_name, last_name, city, state, zip, entity_type,
                        employer, occupation, match_confidence, created_at, updated_at
                 FROM contributor WHERE id = ?1",
                params![id],
                |row| {
                    Ok(ContributorDetail {
                        contributor: contributor_list_from_row(row, 0)?,
                        match_confidence: row.get(10)?,
                        created_at: row.get(11)?,
                        updated_at: row.get(12)?,
                    })
                },
            )
            .optional()
            .map_err(DbError::from)
    }

    /// Lifetime giving from the summary table. A contributor with no
    /// counted contributions gets zeroed stats; an unknown id gets `None`.
    pub fn contributor_stats(&self, id: i64) -> Result<Option<ContributorStats>, DbError> {
        if !self.exists("contributor", id)? {
            return Ok(None);
        }
        let stats = self.query_opt(&contributor_stats_statement(id), |row| {
            Ok(ContributorStats {
                contributor_id: id,
                total_contributions: row.get(0)?,
                total_amount: row.get(1)?,
                unique_recipients: row.get(2)?,
                avg_contribution: row.get(3)?,
                first_contribution_date: row.get(4)?,
                last_contribution_date: row.get(5)?,
            })
        })?;
        Ok(Some(stats.unwrap_or_else(|| ContributorStats::zero(id))))
    }

    pub fn top_contributors(
        &self,
        query: &TopContributorsQuery,
    ) -> Result<(Vec<TopContributor>, i64), DbError> {
        let items = self.query_rows(&query.select_statement(), |row| {
            Ok(TopContributor {
                contributor: contributor_list_from_row(row, 0)?,
                total_amount: row.get(10)?,
                contribution_count: row.get(11)?,
                unique_recipients: row.get(12)?,
            })
        })?;
        let total = self.count(&query.count_statement())?;
        Ok((items, total))
    }

    fn recipient_summary(&self, recipient: Recipient) -> Result<Option<RecipientSummary>, DbError> {
        let summary = match recipient {
            Recipient::Candidate(id) => self
                .conn
                .query_row(
                    "SELECT id, name, office, state, district, party FROM candidate WHERE id = ?1",
                    params![id],
                    |row| {
                        Ok(RecipientSummary::Candidate(CandidateSummary {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            office: row.get(2)?,
                            state: row.get(3)?,
                            district: row.get(4)?,
                            party: row.get(5)?,
                        }))
                    },
                )
                .optional()?,
            Recipient::Committee(id) => self
                .conn
                .query_row(
                    "SELECT cm.id, cm.name, cm.committee_type, cm.state, cm.candidate_id, cd.name
                     FROM committee cm LEFT JOIN candidate cd ON cd.id = cm.candidate_id
                     WHERE cm.id = ?1",
                    params![id],
                    |row| {
                        Ok(RecipientSummary::Committee(CommitteeSummary {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            committee_type: row.get(2)?,
                            state: row.get(3)?,
                            candidate_id: row.get(4)?,
                            candidate_name: row.get(5)?,
                        }))
                    },
                )
                .optional()?,
        };
        Ok(summary)
    }

    /// Contributors to one candidate or committee with their totals toward it.
    ///
    /// Without a date window the totals come from the summary tables,
    /// otherwise they are aggregated from `contribution`; the response is
    /// shaped the same either way. `None` when the recipient does not exist.
    pub fn contributors_by_recipient(
        &self,
        query: &RecipientContributorsQuery,
    ) -> Result<Option<RecipientContributors>, DbError> {
        let Some(recipient) = self.recipient_summary(query.recipient)? else {
            return Ok(None);
        };

        let mut contributors = self.query_rows(&query.select_statement(), |row| {
            Ok(ContributorWithAggregates {
                contributor_id: row.get(0)?,
                contributor_name: row.get(1)?,
                city: row.get(2)?,
                state: row.get(3)?,
                zip: row.get(4)?,
                entity_type: row.get(5)?,
                employer: row.get(6)?,
                occupation: row.get(7)?,
                total_amount: row.get(8)?,
                contribution_count: row.get(9)?,
                first_contribution_date: row.get(10)?,
                last_contribution_date: row.get(11)?,
                contributions: None,
            })
        })?;
        let total = self.count(&query.count_statement())?;
        let summary = self
            .query_opt(&query.summary_statement(), |row| {
                Ok(ContributorsSummary {
                    total_contributors: row.get(0)?,
                    total_amount_raised: row.get(1)?,
                    total_contributions: row.get(2)?,
                    first_contribution: row.get(3)?,
                    last_contribution: row.get(4)?,
                })
            })?
            .unwrap_or(ContributorsSummary {
                total_contributors: 0,
                total_amount_raised: 0.0,
                total_contributions: 0,
                first_contribution: None,
                last_contribution: None,
            });

        if query.include_contributions && !contributors.is_empty() {
            let ids: Vec<i64> = contributors.iter().map(|c| c.contributor_id).collect();
            let mut grouped: HashMap<i64, Vec<ContributionSimple>> = HashMap::new();
            let rows = self.query_rows(&query.contributions_statement(&ids), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    ContributionSimple {
                        id: row.get(1)?,
                        contribution_date: row.get(2)?,
                        amount: row.get(3)?,
                        contribution_type: row.get(4)?,
                    },
                ))
            })?;
            for (contributor_id, contribution) in rows {
                grouped.entry(contributor_id).or_default().push(contribution);
            }
            for c in contributors.iter_mut() {
                c.contributions = Some(grouped.remove(&c.contributor_id).unwrap_or_default());
            }
        }

        let meta = PaginationMeta::from_offset(query.common().offset(), query.common().limit(), total);
        Ok(Some(RecipientContributors {
            recipient,
            summary,
            contributors,
            meta,
        }))
    }

    pub fn search_contributors_aggregated(
        &self,
        query: &ContributorSearchQuery,
    ) -> Result<(Vec<ContributorSearchAggregated>, i64), DbError> {
        let items = self.query_rows(&query.select_statement(), |row| {
            Ok(ContributorSearchAggregated {
                contributor_id: row.get(0)?,
                contributor_name: row.get(1)?,
                city: row.get(2)?,
                state: row.get(3)?,
                zip: row.get(4)?,
                entity_type: row.get(5)?,
                employer: row.get(6)?,
                occupation: row.get(7)?,
                total_amount: row.get(8)?,
                contribution_count: row.get(9)?,
                unique_recipients: row.get(10)?,
                unique_candidates: row.get(11)?,
                unique_committees: row.get(12)?,
                first_contribution_date: row.get(13)?,
                last_contribution_date: row.get(14)?,
            })
        })?;
        let total = self.count(&query.count_statement())?;
        Ok((items, total))
    }

    /// Individual contributions by one contributor, with the receiving committee.
    pub fn contributor_contributions(
        &self,
        query: &ContributorContributionsQuery,
    ) -> Result<Vec<ContributionWithCommittee>, DbError> {
        self.query_rows(&query.select_statement(), |row| {
            Ok(ContributionWithCommittee {
                id: row.get(0)?,
                contributor_id: row.get(1)?,
                recipient_committee_id: row.get(2)?,
                committee_name: row.get(3)?,
                committee_type: row.get(4)?,
                committee_state: row.get(5)?,
                committee_party: row.get(6)?,
                amount: row.get(7)?,
                contribution_date: row.get(8)?,
                contribution_type: row.get(9)?,
            })
        })
    }

    pub fn contributor_recipients(
        &self,
        query: &ContributorRecipientsQuery,
    ) -> Result<(Vec<ContributorRecipient>, i64), DbError> {
        let items = self.query_rows(&query.select_statement(), |row| {
            Ok(ContributorRecipient {
                committee_id: row.get(0)?,
                committee_name: row.get(1)?,
                committee_type: row.get(2)?,
                committee_state: row.get(3)?,
                committee_party: row.get(4)?,
                contribution_count: row.get(5)?,
                total_amount: row.get(6)?,
                first_contribution_date: row.get(7)?,
                last_contribution_date: row.get(8)?,
            })
        })?;
        let total = self.count(&query.count_statement())?;
        Ok((items, total))
    }

    /// Contributors whose name matches `search`, for the unified search.
    pub fn search_contributors(
        &self,
        search: &str,
        page_size: i64,
    ) -> Result<(Vec<ContributorList>, i64), DbError> {
        let query = ContributorQuery::default()
            .with_search(search)
            .with_page_size(page_size);
        self.query_contributors(&query)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use fundlens_query::{ContributorContributionsSortBy, SortDirection};

    use super::super::fixtures::{open_refreshed_db, open_seeded_db};
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn list_is_sorted_by_name() {
        let db = open_seeded_db();
        let (items, total) = db.query_contributors(&ContributorQuery::default()).unwrap();
        assert_eq!(total, 4);
        let names: Vec<&str> = items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ADAMS, ALICE", "BROWN, BOB", "CHEN, CAROL", "TEACHERS PAC"]);
    }

    #[test]
    fn list_filters_by_state_and_employer() {
        let db = open_seeded_db();
        let query = ContributorQuery::default()
            .with_state("MD")
            .with_employer("acme");
        let (items, total) = db.query_contributors(&query).unwrap();
        assert_eq!(total, 2);
        assert!(items.iter().all(|c| c.state.as_deref() == Some("MD")));
    }

    #[test]
    fn detail_includes_match_confidence() {
        let db = open_seeded_db();
        let detail = db.get_contributor(1).unwrap().unwrap();
        assert_eq!(detail.contributor.name, "ADAMS, ALICE");
        assert_eq!(detail.match_confidence, Some(0.95));
        assert!(!detail.created_at.is_empty());
        assert!(db.get_contributor(999).unwrap().is_none());
    }

    #[test]
    fn stats_come_from_summary_table() {
        let db = open_refreshed_db();
        let stats = db.contributor_stats(1).unwrap().unwrap();
        // the earmarked 999.00 is left out
        assert_eq!(stats.total_contributions, 3);
        assert_eq!(stats.total_amount, 550.0);
        assert_eq!(stats.unique_recipients, 2);
        assert_eq!(stats.first_contribution_date.as_deref(), Some("2024-01-15"));
        assert_eq!(stats.last_contribution_date.as_deref(), Some("2024-06-01"));
    }

    #[test]
    fn stats_zeroed_without_contributions() {
        let db = open_refreshed_db();
        assert_eq!(db.contributor_stats(4).unwrap(), Some(ContributorStats::zero(4)));
        assert!(db.contributor_stats(999).unwrap().is_none());
    }

    #[test]
    fn top_contributors_ranked_by_total() {
        let db = open_refreshed_db();
        let (items, total) = db.top_contributors(&TopContributorsQuery::default()).unwrap();
        assert_eq!(total, 3);
        let ids: Vec<i64> = items.iter().map(|t| t.contributor.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(items[1].total_amount, 575.0);

        let (md, _) = db
            .top_contributors(&TopContributorsQuery::default().with_state("MD"))
            .unwrap();
        assert_eq!(md.len(), 1);
        assert_eq!(md[0].contributor.id, 1);
    }

    #[test]
    fn by_candidate_from_summary_table() {
        let db = open_refreshed_db();
        let query = RecipientContributorsQuery::new(Recipient::Candidate(1));
        let result = db.contributors_by_recipient(&query).unwrap().unwrap();

        match &result.recipient {
            RecipientSummary::Candidate(c) => assert_eq!(c.name, "RASKIN, JAMIE"),
            other => panic!("unexpected recipient {:?}", other),
        }
        let ids: Vec<i64> = result.contributors.iter().map(|c| c.contributor_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(result.contributors[1].total_amount, 350.0);
        assert_eq!(result.contributors[1].contribution_count, 2);
        assert!(result.contributors[0].contributions.is_none());

        assert_eq!(result.summary.total_contributors, 2);
        assert_eq!(result.summary.total_amount_raised, 850.0);
        assert_eq!(result.summary.total_contributions, 3);
        assert_eq!(result.summary.first_contribution.as_deref(), Some("2024-01-15"));
        assert_eq!(result.summary.last_contribution.as_deref(), Some("2024-03-10"));
        assert_eq!(result.meta.total_items, 2);
        assert_eq!(result.meta.page, 1);
    }

    #[test]
    fn summary_table_and_live_paths_agree() {
        let db = open_refreshed_db();
        let mv = db
            .contributors_by_recipient(&RecipientContributorsQuery::new(Recipient::Candidate(1)))
            .unwrap()
            .unwrap();
        let live_query = RecipientContributorsQuery::new(Recipient::Candidate(1))
            .with_date_from(date("2000-01-01"))
            .with_date_to(date("2100-12-31"));
        assert!(!live_query.uses_materialized_view());
        let live = db.contributors_by_recipient(&live_query).unwrap().unwrap();
        assert_eq!(mv, live);
    }

    #[test]
    fn date_window_aggregates_live() {
        let db = open_refreshed_db();
        let query = RecipientContributorsQuery::new(Recipient::Candidate(1))
            .with_date_from(date("2024-02-01"))
            .with_date_to(date("2024-12-31"));
        let result = db.contributors_by_recipient(&query).unwrap().unwrap();
        assert_eq!(result.summary.total_amount_raised, 750.0);
        let alice = result
            .contributors
            .iter()
            .find(|c| c.contributor_id == 1)
            .unwrap();
        assert_eq!(alice.total_amount, 250.0);
        assert_eq!(alice.contribution_count, 1);
    }

    #[test]
    fn nested_contributions_newest_first() {
        let db = open_refreshed_db();
        let query = RecipientContributorsQuery::new(Recipient::Candidate(1)).with_contributions(true);
        let result = db.contributors_by_recipient(&query).unwrap().unwrap();
        let alice = result
            .contributors
            .iter()
            .find(|c| c.contributor_id == 1)
            .unwrap();
        let ids: Vec<i64> = alice
            .contributions
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![101, 102, 100]);
    }

    #[test]
    fn by_committee_names_linked_candidate() {
        let db = open_refreshed_db();
        let raskin = db
            .contributors_by_recipient(&RecipientContributorsQuery::new(Recipient::Committee(10)))
            .unwrap()
            .unwrap();
        match &raskin.recipient {
            RecipientSummary::Committee(c) => {
                assert_eq!(c.candidate_name.as_deref(), Some("RASKIN, JAMIE"))
            }
            other => panic!("unexpected recipient {:?}", other),
        }

        let actblue = db
            .contributors_by_recipient(&RecipientContributorsQuery::new(Recipient::Committee(12)))
            .unwrap()
            .unwrap();
        // the conduit memo row is not counted
        assert_eq!(actblue.summary.total_amount_raised, 75.0);
        assert_eq!(actblue.contributors.len(), 1);
    }

    #[test]
    fn committee_date_window_keeps_conduit_rows() {
        let db = open_refreshed_db();
        let query = RecipientContributorsQuery::new(Recipient::Committee(12))
            .with_date_from(date("2000-01-01"));
        let result = db.contributors_by_recipient(&query).unwrap().unwrap();
        assert_eq!(result.summary.total_amount_raised, 125.0);
        assert_eq!(result.summary.total_contributions, 2);
        assert_eq!(result.contributors.len(), 1);
        assert_eq!(result.contributors[0].contribution_count, 2);
    }

    #[test]
    fn unknown_recipient_is_none() {
        let db = open_refreshed_db();
        let query = RecipientContributorsQuery::new(Recipient::Candidate(999));
        assert!(db.contributors_by_recipient(&query).unwrap().is_none());
    }

    #[test]
    fn recipient_without_contributions_has_empty_summary() {
        let db = open_refreshed_db();
        let query = RecipientContributorsQuery::new(Recipient::Candidate(3));
        let result = db.contributors_by_recipient(&query).unwrap().unwrap();
        assert!(result.contributors.is_empty());
        assert_eq!(result.summary.total_contributors, 0);
        assert_eq!(result.summary.total_amount_raised, 0.0);
        assert_eq!(result.meta.total_pages, 0);
    }

    #[test]
    fn aggregated_search_counts_every_contribution() {
        let db = open_seeded_db();
        let (items, total) = db
            .search_contributors_aggregated(&ContributorSearchQuery::new("a"))
            .unwrap();
        assert_eq!(total, 3);
        let ids: Vec<i64> = items.iter().map(|c| c.contributor_id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(items[0].total_amount, 1549.0);
        assert_eq!(items[0].unique_candidates, 2);
        assert_eq!(items[2].contribution_count, 0);

        let (_, over) = db
            .search_contributors_aggregated(&ContributorSearchQuery::new("a").with_min_amount(1000.0))
            .unwrap();
        assert_eq!(over, 2);
    }

    #[test]
    fn contributions_by_contributor_sorted() {
        let db = open_seeded_db();
        let all = db
            .contributor_contributions(&ContributorContributionsQuery::new(1))
            .unwrap();
        let ids: Vec<i64> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![102, 101, 105, 100]);
        assert_eq!(all[0].committee_name, "RASKIN FOR CONGRESS");

        let windowed = db
            .contributor_contributions(
                &ContributorContributionsQuery::new(1)
                    .with_sort_by(ContributorContributionsSortBy::Date)
                    .with_sort_direction(SortDirection::Asc)
                    .with_start_date(date("2024-03-01")),
            )
            .unwrap();
        let ids: Vec<i64> = windowed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![101, 105]);
    }

    #[test]
    fn recipients_grouped_by_committee() {
        let db = open_refreshed_db();
        let (items, total) = db
            .contributor_recipients(&ContributorRecipientsQuery::new(1))
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(items[0].committee_id, 10);
        assert_eq!(items[0].total_amount, 350.0);
        assert_eq!(items[1].committee_name, "HOGAN FOR SENATE");
    }

    #[test]
    fn unified_contributor_search() {
        let db = open_seeded_db();
        let (items, total) = db.search_contributors("acme", 10).unwrap();
        assert_eq!(total, 0);
        assert!(items.is_empty());
        let (items, total) = db.search_contributors("chen", 10).unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].id, 4);
    }
}
