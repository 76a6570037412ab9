use std::str::FromStr;

use chrono::NaiveDate;

use crate::sql::{squish, Bindings, SqlStatement, WhereClause};
use crate::Error;

use super::{common::QueryCommon, Query};

/// Name search across contributors, with lifetime totals aggregated live
/// over every contribution they made.
#[derive(Clone, Debug)]
pub struct ContributorSearchQuery {
    pub common: QueryCommon,
    pub search: String,
    pub state: Option<String>,
    pub entity_type: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    /// Keeps contributors whose first contribution is on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Keeps contributors whose last contribution is on or before this date.
    pub date_to: Option<NaiveDate>,
    pub sort_by: ContributorSearchSortBy,
}

impl ContributorSearchQuery {
    pub fn new(search: &str) -> Self {
        Self {
            common: QueryCommon::with_page_size(25),
            search: search.to_string(),
            state: None,
            entity_type: None,
            min_amount: None,
            max_amount: None,
            date_from: None,
            date_to: None,
            sort_by: ContributorSearchSortBy::default(),
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

    pub fn with_sort_by(mut self, sort_by: ContributorSearchSortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Grouped body shared by the page and count statements.
    fn grouped_sql(&self, select: &str, b: &mut Bindings) -> String {
        let mut filters = WhereClause::new();
        let p = b.bind_contains(&self.search);
        filters.push(format!("ct.name LIKE {}", p));
        if let Some(ref state) = self.state {
            let p = b.bind(state);
            filters.push(format!("ct.state = {}", p));
        }
        if let Some(ref entity_type) = self.entity_type {
            let p = b.bind(entity_type);
            filters.push(format!("ct.entity_type = {}", p));
        }

        let mut having = WhereClause::new();
        if let Some(min) = self.min_amount {
            let p = b.bind(min);
            having.push(format!("COALESCE(SUM(x.amount), 0) >= {}", p));
        }
        if let Some(max) = self.max_amount {
            let p = b.bind(max);
            having.push(format!("COALESCE(SUM(x.amount), 0) <= {}", p));
        }
        if let Some(from) = self.date_from {
            let p = b.bind(from.to_string());
            having.push(format!("MIN(x.contribution_date) >= {}", p));
        }
        if let Some(to) = self.date_to {
            let p = b.bind(to.to_string());
            having.push(format!("MAX(x.contribution_date) <= {}", p));
        }

        format!(
            "SELECT {} FROM contributor ct LEFT JOIN contribution x ON x.contributor_id = ct.id \
             {} GROUP BY ct.id{}",
            select,
            filters.to_where_sql(),
            having.to_having_sql()
        )
    }

    /// Columns: `contributor_id, contributor_name, city, state, zip, entity_type,
    /// employer, occupation, total_amount, contribution_count, unique_recipients,
    /// unique_candidates, unique_committees, first_contribution_date,
    /// last_contribution_date`.
    pub fn select_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let body = self.grouped_sql(
            "ct.id, ct.name, ct.city, ct.state, ct.zip, ct.entity_type, ct.employer, \
             ct.occupation, COALESCE(SUM(x.amount), 0) AS total_amount, \
             COUNT(x.id) AS contribution_count, \
             COUNT(DISTINCT x.recipient_committee_id) AS unique_recipients, \
             COUNT(DISTINCT x.recipient_candidate_id) AS unique_candidates, \
             COUNT(DISTINCT x.recipient_committee_id) AS unique_committees, \
             MIN(x.contribution_date) AS first_contribution_date, \
             MAX(x.contribution_date) AS last_contribution_date",
            &mut b,
        );
        let column = match self.sort_by {
            ContributorSearchSortBy::Name => "ct.name",
            ContributorSearchSortBy::TotalAmount => "total_amount",
            ContributorSearchSortBy::ContributionCount => "contribution_count",
            ContributorSearchSortBy::UniqueRecipients => "unique_recipients",
            ContributorSearchSortBy::FirstDate => "first_contribution_date",
            ContributorSearchSortBy::LastDate => "last_contribution_date",
        };
        let sql = format!(
            "{} ORDER BY {} {} NULLS LAST{}",
            body,
            column,
            self.common.sort_direction.as_sql(),
            self.common.limit_offset_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }

    pub fn count_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let body = self.grouped_sql("ct.id", &mut b);
        SqlStatement::new(squish(&format!("SELECT COUNT(*) FROM ({})", body)), b)
    }
}

impl Query for ContributorSearchQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn common(&self) -> &QueryCommon {
        &self.common
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContributorSearchSortBy {
    Name,
    #[default]
    TotalAmount,
    ContributionCount,
    UniqueRecipients,
    FirstDate,
    LastDate,
}
impl FromStr for ContributorSearchSortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ContributorSearchSortBy::Name),
            "total_amount" => Ok(ContributorSearchSortBy::TotalAmount),
            "contribution_count" => Ok(ContributorSearchSortBy::ContributionCount),
            "unique_recipients" => Ok(ContributorSearchSortBy::UniqueRecipients),
            "first_date" => Ok(ContributorSearchSortBy::FirstDate),
            "last_date" => Ok(ContributorSearchSortBy::LastDate),
            _ => Err(Error::InvalidSortBy {
                value: s.to_string(),
                allowed: "name, total_amount, contribution_count, unique_recipients, first_date, last_date",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::query::{contributor_search::ContributorSearchSortBy, ContributorSearchQuery};
    use crate::sql::SqlParam;

    #[test]
    fn test_search_aggregated_count() {
        let q = ContributorSearchQuery::new("smith")
            .with_state("MD")
            .with_min_amount(1000.0);
        insta::assert_snapshot!(
            q.count_statement().sql,
            @"SELECT COUNT(*) FROM (SELECT ct.id FROM contributor ct LEFT JOIN contribution x ON x.contributor_id = ct.id WHERE ct.name LIKE ?1 AND ct.state = ?2 GROUP BY ct.id HAVING COALESCE(SUM(x.amount), 0) >= ?3)"
        );
    }

    #[test]
    fn test_search_aggregated_dates_and_sort() {
        let stmt = ContributorSearchQuery::new("pac")
            .with_date_from(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
            .with_date_to(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap())
            .with_sort_by(ContributorSearchSortBy::LastDate)
            .select_statement();
        assert!(stmt.sql.contains(
            "HAVING MIN(x.contribution_date) >= ?2 AND MAX(x.contribution_date) <= ?3"
        ));
        assert!(stmt
            .sql
            .contains("ORDER BY last_contribution_date DESC NULLS LAST LIMIT 25 OFFSET 0"));
        assert_eq!(
            stmt.params,
            vec![
                SqlParam::Text("%pac%".into()),
                SqlParam::Text("2023-01-01".into()),
                SqlParam::Text("2024-12-31".into()),
            ]
        );
    }
}
