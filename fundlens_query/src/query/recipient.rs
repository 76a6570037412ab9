//! Contributors to one candidate or committee, with per-contributor totals.
//!
//! Two sources can produce the per-contributor aggregate:
//!
//! * the `mv_contributor_{candidate,committee}_stats` summary tables, which
//!   are only usable when no date window is requested, and
//! * a live `GROUP BY contributor_id` over `contribution`, restricted to the
//!   date window.
//!
//! Both sources expose the same five columns under the alias `a`
//! (`contributor_id, contribution_count, total_amount, first_contribution_date,
//! last_contribution_date`), so the page, count and summary statements are
//! built identically on either path.

use std::str::FromStr;

use chrono::NaiveDate;

use crate::sql::{earmark_exclusion, squish, Bindings, SqlStatement, WhereClause};
use crate::Error;

use super::{common::QueryCommon, Query};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Recipient {
    Candidate(i64),
    Committee(i64),
}

impl Recipient {
    pub fn id(&self) -> i64 {
        match self {
            Recipient::Candidate(id) | Recipient::Committee(id) => *id,
        }
    }

    fn view(&self) -> (&'static str, &'static str) {
        match self {
            Recipient::Candidate(_) => ("mv_contributor_candidate_stats", "candidate_id"),
            Recipient::Committee(_) => ("mv_contributor_committee_stats", "committee_id"),
        }
    }

    fn contribution_column(&self) -> &'static str {
        match self {
            Recipient::Candidate(_) => "recipient_candidate_id",
            Recipient::Committee(_) => "recipient_committee_id",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RecipientContributorsQuery {
    pub common: QueryCommon,
    pub recipient: Recipient,
    pub state: Option<String>,
    pub entity_type: Option<String>,
    pub search: Option<String>,
    /// Bounds on the contributor's total to this recipient.
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sort_by: RecipientSortBy,
    pub include_contributions: bool,
}

impl RecipientContributorsQuery {
    pub fn new(recipient: Recipient) -> Self {
        Self {
            common: QueryCommon::with_page_size(25),
            recipient,
            state: None,
            entity_type: None,
            search: None,
            min_amount: None,
            max_amount: None,
            date_from: None,
            date_to: None,
            sort_by: RecipientSortBy::default(),
            include_contributions: false,
        }
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn with_entity_type(mut self, entity_type: &str) -> Self {
        self.entity_type = Some(entity_type.to_string());
        self
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_min_amount(mut self, min_amount: f64) -> Self {
        self.min_amount = Some(min_amount);
        self
    }

    pub fn with_max_amount(mut self, max_amount: f64) -> Self {
        self.max_amount = Some(max_amount);
        self
    }

    pub fn with_date_from(mut self, date_from: NaiveDate) -> Self {
        self.date_from = Some(date_from);
        self
    }

    pub fn with_date_to(mut self, date_to: NaiveDate) -> Self {
        self.date_to = Some(date_to);
        self
    }

    pub fn with_sort_by(mut self, sort_by: RecipientSortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_contributions(mut self, include_contributions: bool) -> Self {
        self.include_contributions = include_contributions;
        self
    }

    /// True when the precomputed summary tables can answer this query.
    pub fn uses_materialized_view(&self) -> bool {
        self.date_from.is_none() && self.date_to.is_none()
    }

    /// Conditions selecting this recipient's contributions in the date window,
    /// on contribution alias `x`. Earmark rows are dropped only when asked.
    fn contribution_filters(&self, b: &mut Bindings, exclude_earmarks: bool) -> WhereClause {
        let mut w = WhereClause::new();
        let p = b.bind(self.recipient.id());
        w.push(format!("x.{} = {}", self.recipient.contribution_column(), p));
        if exclude_earmarks {
            w.push(earmark_exclusion("x"));
        }
        if let Some(from) = self.date_from {
            let p = b.bind(from.to_string());
            w.push(format!("x.contribution_date >= {}", p));
        }
        if let Some(to) = self.date_to {
            let p = b.bind(to.to_string());
            w.push(format!("x.contribution_date <= {}", p));
        }
        w
    }

    /// Per-contributor aggregate for this recipient.
    fn source_sql(&self, b: &mut Bindings) -> String {
        if self.uses_materialized_view() {
            let (table, key) = self.recipient.view();
            let p = b.bind(self.recipient.id());
            format!(
                "SELECT contributor_id, contribution_count, total_amount, \
                 first_contribution_date, last_contribution_date FROM {} WHERE {} = {}",
                table, key, p
            )
        } else {
            format!(
                "SELECT x.contributor_id AS contributor_id, COUNT(x.id) AS contribution_count, \
                 COALESCE(SUM(x.amount), 0) AS total_amount, \
                 MIN(x.contribution_date) AS first_contribution_date, \
                 MAX(x.contribution_date) AS last_contribution_date \
                 FROM contribution x {} GROUP BY x.contributor_id",
                self.contribution_filters(b, matches!(self.recipient, Recipient::Candidate(_)))
                    .to_where_sql()
            )
        }
    }

    fn contributor_filters(&self, b: &mut Bindings) -> WhereClause {
        let mut w = WhereClause::new();
        if let Some(ref state) = self.state {
            let p = b.bind(state);
            w.push(format!("ct.state = {}", p));
        }
        if let Some(ref entity_type) = self.entity_type {
            let p = b.bind(entity_type);
            w.push(format!("ct.entity_type = {}", p));
        }
        if let Some(ref search) = self.search {
            let p = b.bind_contains(search);
            w.push(format!("ct.name LIKE {}", p));
        }
        if let Some(min) = self.min_amount {
            let p = b.bind(min);
            w.push(format!("a.total_amount >= {}", p));
        }
        if let Some(max) = self.max_amount {
            let p = b.bind(max);
            w.push(format!("a.total_amount <= {}", p));
        }
        w
    }

    /// Columns: `contributor_id, contributor_name, city, state, zip, entity_type,
    /// employer, occupation, total_amount, contribution_count,
    /// first_contribution_date, last_contribution_date`.
    pub fn select_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let source = self.source_sql(&mut b);
        let filters = self.contributor_filters(&mut b);
        let column = match self.sort_by {
            RecipientSortBy::TotalAmount => "a.total_amount",
            RecipientSortBy::ContributionCount => "a.contribution_count",
            RecipientSortBy::Name => "ct.name",
            RecipientSortBy::FirstDate => "a.first_contribution_date",
            RecipientSortBy::LastDate => "a.last_contribution_date",
        };
        let sql = format!(
            "SELECT ct.id, ct.name, ct.city, ct.state, ct.zip, ct.entity_type, ct.employer, \
             ct.occupation, a.total_amount, a.contribution_count, a.first_contribution_date, \
             a.last_contribution_date \
             FROM ({}) a JOIN contributor ct ON ct.id = a.contributor_id \
             {} ORDER BY {} {}, ct.id{}",
            source,
            filters.to_where_sql(),
            column,
            self.common.sort_direction.as_sql(),
            self.common.limit_offset_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }

    pub fn count_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let source = self.source_sql(&mut b);
        let filters = self.contributor_filters(&mut b);
        let sql = format!(
            "SELECT COUNT(*) FROM ({}) a JOIN contributor ct ON ct.id = a.contributor_id {}",
            source,
            filters.to_where_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }

    /// Recipient-wide totals, independent of the contributor filters.
    /// Columns: `total_contributors, total_amount_raised, total_contributions,
    /// first_contribution, last_contribution`.
    pub fn summary_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let source = self.source_sql(&mut b);
        let sql = format!(
            "SELECT COUNT(*), COALESCE(SUM(a.total_amount), 0), \
             COALESCE(SUM(a.contribution_count), 0), MIN(a.first_contribution_date), \
             MAX(a.last_contribution_date) FROM ({}) a",
            source
        );
        SqlStatement::new(squish(&sql), b)
    }

    /// Individual contributions behind the given page of contributors.
    /// Columns: `contributor_id, id, contribution_date, amount, contribution_type`.
    pub fn contributions_statement(&self, contributor_ids: &[i64]) -> SqlStatement {
        let mut b = Bindings::new();
        let mut filters = self.contribution_filters(&mut b, false);
        let ids = b.bind_list(contributor_ids.iter().copied());
        filters.push(format!("x.contributor_id IN ({})", ids));
        let sql = format!(
            "SELECT x.contributor_id, x.id, x.contribution_date, x.amount, x.contribution_type \
             FROM contribution x {} ORDER BY x.contributor_id, x.contribution_date DESC",
            filters.to_where_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }
}

impl Query for RecipientContributorsQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn common(&self) -> &QueryCommon {
        &self.common
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecipientSortBy {
    #[default]
    TotalAmount,
    ContributionCount,
    Name,
    FirstDate,
    LastDate,
}
impl std::fmt::Display for RecipientSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RecipientSortBy::TotalAmount => "total_amount",
                RecipientSortBy::ContributionCount => "contribution_count",
                RecipientSortBy::Name => "name",
                RecipientSortBy::FirstDate => "first_date",
                RecipientSortBy::LastDate => "last_date",
            }
        )?;
        Ok(())
    }
}
impl FromStr for RecipientSortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "total_amount" => Ok(RecipientSortBy::TotalAmount),
            "contribution_count" => Ok(RecipientSortBy::ContributionCount),
            "name" => Ok(RecipientSortBy::Name),
            "first_date" => Ok(RecipientSortBy::FirstDate),
            "last_date" => Ok(RecipientSortBy::LastDate),
            _ => Err(Error::InvalidSortBy {
                value: s.to_string(),
                allowed: "total_amount, contribution_count, name, first_date, last_date",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::query::{
        recipient::{Recipient, RecipientSortBy},
        Query, RecipientContributorsQuery,
    };
    use crate::sql::SqlParam;

    #[test]
    fn test_materialized_view_path_without_dates() {
        let q = RecipientContributorsQuery::new(Recipient::Candidate(4));
        assert!(q.uses_materialized_view());
        insta::assert_snapshot!(
            q.summary_statement().sql,
            @"SELECT COUNT(*), COALESCE(SUM(a.total_amount), 0), COALESCE(SUM(a.contribution_count), 0), MIN(a.first_contribution_date), MAX(a.last_contribution_date) FROM (SELECT contributor_id, contribution_count, total_amount, first_contribution_date, last_contribution_date FROM mv_contributor_candidate_stats WHERE candidate_id = ?1) a"
        );
    }

    #[test]
    fn test_live_path_with_date_window() {
        let q = RecipientContributorsQuery::new(Recipient::Committee(11))
            .with_date_from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(!q.uses_materialized_view());
        let stmt = q.count_statement();
        assert!(stmt.sql.contains("FROM contribution x WHERE x.recipient_committee_id = ?1"));
        assert!(stmt.sql.contains("x.contribution_date >= ?2 GROUP BY x.contributor_id"));
        assert!(!stmt.sql.contains("mv_contributor"));
        assert!(!stmt.sql.contains("is_earmark_receipt"));
        assert_eq!(
            stmt.params,
            vec![SqlParam::Integer(11), SqlParam::Text("2024-01-01".into())]
        );
    }

    #[test]
    fn test_both_paths_share_column_shape() {
        let mv = RecipientContributorsQuery::new(Recipient::Candidate(1));
        let live = mv
            .clone()
            .with_date_to(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        let head = |sql: String| sql.split(" FROM (").next().unwrap_or_default().to_string();
        assert_eq!(
            head(mv.select_statement().sql),
            head(live.select_statement().sql)
        );
        assert_eq!(
            head(mv.summary_statement().sql),
            head(live.summary_statement().sql)
        );
    }

    #[test]
    fn test_contributor_filters_and_sort() {
        let stmt = RecipientContributorsQuery::new(Recipient::Candidate(2))
            .with_state("MD")
            .with_min_amount(200.0)
            .with_sort_by(RecipientSortBy::Name)
            .with_page(2)
            .select_statement();
        assert!(stmt
            .sql
            .contains("WHERE ct.state = ?2 AND a.total_amount >= ?3 ORDER BY ct.name DESC, ct.id LIMIT 25 OFFSET 25"));
    }

    #[test]
    fn test_contributions_statement_binds_ids_after_window() {
        let stmt = RecipientContributorsQuery::new(Recipient::Candidate(5))
            .contributions_statement(&[7, 8]);
        assert!(stmt.sql.contains("x.recipient_candidate_id = ?1 AND x.contributor_id IN (?2, ?3)"));
        assert!(!stmt.sql.contains("is_earmark_receipt"));
        assert!(stmt
            .sql
            .ends_with("ORDER BY x.contributor_id, x.contribution_date DESC"));
    }
}
