use std::str::FromStr;

use chrono::NaiveDate;

use crate::sql::{squish, Bindings, SqlStatement, WhereClause};
use crate::Error;

use super::{
    common::{QueryCommon, SortDirection},
    Query,
};

/// Columns mapped into a contributor list row, aliased `ct`.
pub const CONTRIBUTOR_COLUMNS: &str = "ct.id, ct.name, ct.first_name, ct.last_name, ct.city, \
     ct.state, ct.zip, ct.entity_type, ct.employer, ct.occupation";

/// Contributor listing and name search.
#[derive(Clone, Debug, Default)]
pub struct ContributorQuery {
    pub common: QueryCommon,
    pub search: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub entity_type: Option<String>,
    /// Partial match.
    pub employer: Option<String>,
    /// Partial match.
    pub occupation: Option<String>,
}

impl Query for ContributorQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn common(&self) -> &QueryCommon {
        &self.common
    }
}

impl ContributorQuery {
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn with_city(mut self, city: &str) -> Self {
        self.city = Some(city.to_string());
        self
    }

    pub fn with_entity_type(mut self, entity_type: &str) -> Self {
        self.entity_type = Some(entity_type.to_string());
        self
    }

    pub fn with_employer(mut self, employer: &str) -> Self {
        self.employer = Some(employer.to_string());
        self
    }

    pub fn with_occupation(mut self, occupation: &str) -> Self {
        self.occupation = Some(occupation.to_string());
        self
    }

    fn filters(&self, b: &mut Bindings) -> WhereClause {
        let mut w = WhereClause::new();
        if let Some(ref search) = self.search {
            let p = b.bind_contains(search);
            w.push(format!("ct.name LIKE {}", p));
        }
        if let Some(ref state) = self.state {
            let p = b.bind(state);
            w.push(format!("ct.state = {}", p));
        }
        if let Some(ref city) = self.city {
            let p = b.bind(city);
            w.push(format!("ct.city = {}", p));
        }
        if let Some(ref entity_type) = self.entity_type {
            let p = b.bind(entity_type);
            w.push(format!("ct.entity_type = {}", p));
        }
        if let Some(ref employer) = self.employer {
            let p = b.bind_contains(employer);
            w.push(format!("ct.employer LIKE {}", p));
        }
        if let Some(ref occupation) = self.occupation {
            let p = b.bind_contains(occupation);
            w.push(format!("ct.occupation LIKE {}", p));
        }
        w
    }

    pub fn select_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let sql = format!(
            "SELECT {} FROM contributor ct {} ORDER BY ct.name{}",
            CONTRIBUTOR_COLUMNS,
            filters.to_where_sql(),
            self.common.limit_offset_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }

    pub fn count_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let sql = format!("SELECT COUNT(*) FROM contributor ct {}", filters.to_where_sql());
        SqlStatement::new(sql, b)
    }
}

/// Largest contributors overall, read from `mv_contributor_stats`.
#[derive(Clone, Debug)]
pub struct TopContributorsQuery {
    pub limit: i64,
    pub state: Option<String>,
    pub entity_type: Option<String>,
}

impl Default for TopContributorsQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            state: None,
            entity_type: None,
        }
    }
}

impl TopContributorsQuery {
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn with_entity_type(mut self, entity_type: &str) -> Self {
        self.entity_type = Some(entity_type.to_string());
        self
    }

    fn filters(&self, b: &mut Bindings) -> WhereClause {
        let mut w = WhereClause::new();
        if let Some(ref state) = self.state {
            let p = b.bind(state);
            w.push(format!("ct.state = {}", p));
        }
        if let Some(ref entity_type) = self.entity_type {
            let p = b.bind(entity_type);
            w.push(format!("ct.entity_type = {}", p));
        }
        w
    }

    /// Columns: contributor columns, then `total_amount, total_contributions, unique_recipients`.
    pub fn select_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let sql = format!(
            "SELECT {}, mv.total_amount, mv.total_contributions, mv.unique_recipients \
             FROM mv_contributor_stats mv JOIN contributor ct ON ct.id = mv.contributor_id \
             {} ORDER BY mv.total_amount DESC LIMIT {}",
            CONTRIBUTOR_COLUMNS,
            filters.to_where_sql(),
            self.limit.max(1)
        );
        SqlStatement::new(squish(&sql), b)
    }

    pub fn count_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let sql = format!(
            "SELECT COUNT(*) FROM mv_contributor_stats mv \
             JOIN contributor ct ON ct.id = mv.contributor_id {}",
            filters.to_where_sql()
        );
        SqlStatement::new(sql, b)
    }
}

/// Lifetime stats for one contributor from `mv_contributor_stats`.
pub fn contributor_stats_statement(contributor_id: i64) -> SqlStatement {
    let mut b = Bindings::new();
    let p = b.bind(contributor_id);
    let sql = format!(
        "SELECT total_contributions, total_amount, unique_recipients, avg_contribution, \
         first_contribution_date, last_contribution_date \
         FROM mv_contributor_stats WHERE contributor_id = {}",
        p
    );
    SqlStatement::new(sql, b)
}

/// A single contributor's contributions with the receiving committee.
#[derive(Clone, Debug)]
pub struct ContributorContributionsQuery {
    pub contributor_id: i64,
    pub limit: i64,
    pub sort_by: ContributorContributionsSortBy,
    pub sort_direction: SortDirection,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ContributorContributionsQuery {
    pub fn new(contributor_id: i64) -> Self {
        Self {
            contributor_id,
            limit: 1000,
            sort_by: ContributorContributionsSortBy::default(),
            sort_direction: SortDirection::Desc,
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_sort_by(mut self, sort_by: ContributorContributionsSortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_sort_direction(mut self, sort_direction: SortDirection) -> Self {
        self.sort_direction = sort_direction;
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Columns: `id, contributor_id, recipient_committee_id, committee_name,
    /// committee_type, committee_state, committee_party, amount,
    /// contribution_date, contribution_type`.
    pub fn select_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let mut w = WhereClause::new();
        let p = b.bind(self.contributor_id);
        w.push(format!("x.contributor_id = {}", p));
        if let Some(start) = self.start_date {
            let p = b.bind(start.to_string());
            w.push(format!("x.contribution_date >= {}", p));
        }
        if let Some(end) = self.end_date {
            let p = b.bind(end.to_string());
            w.push(format!("x.contribution_date <= {}", p));
        }
        let column = match self.sort_by {
            ContributorContributionsSortBy::Recipient => "cm.name",
            ContributorContributionsSortBy::Date => "x.contribution_date",
            ContributorContributionsSortBy::Amount => "x.amount",
        };
        let sql = format!(
            "SELECT x.id, x.contributor_id, x.recipient_committee_id, cm.name, \
             cm.committee_type, cm.state, cm.party, x.amount, x.contribution_date, \
             x.contribution_type \
             FROM contribution x JOIN committee cm ON cm.id = x.recipient_committee_id \
             {} ORDER BY {} {} LIMIT {}",
            w.to_where_sql(),
            column,
            self.sort_direction.as_sql(),
            self.limit.clamp(1, 1000)
        );
        SqlStatement::new(squish(&sql), b)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContributorContributionsSortBy {
    Recipient,
    Date,
    #[default]
    Amount,
}
impl FromStr for ContributorContributionsSortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recipient" => Ok(ContributorContributionsSortBy::Recipient),
            "date" => Ok(ContributorContributionsSortBy::Date),
            "amount" => Ok(ContributorContributionsSortBy::Amount),
            _ => Err(Error::InvalidSortBy {
                value: s.to_string(),
                allowed: "recipient, date, amount",
            }),
        }
    }
}

/// Committees a contributor has given to, from `mv_contributor_committee_stats`.
#[derive(Clone, Debug)]
pub struct ContributorRecipientsQuery {
    pub contributor_id: i64,
    pub sort_by: ContributorRecipientsSortBy,
    pub sort_direction: SortDirection,
}

impl ContributorRecipientsQuery {
    pub fn new(contributor_id: i64) -> Self {
        Self {
            contributor_id,
            sort_by: ContributorRecipientsSortBy::default(),
            sort_direction: SortDirection::Desc,
        }
    }

    pub fn with_sort_by(mut self, sort_by: ContributorRecipientsSortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_sort_direction(mut self, sort_direction: SortDirection) -> Self {
        self.sort_direction = sort_direction;
        self
    }

    /// Columns: `committee_id, committee_name, committee_type, committee_state,
    /// committee_party, contribution_count, total_amount, first_contribution_date,
    /// last_contribution_date`.
    pub fn select_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let p = b.bind(self.contributor_id);
        let column = match self.sort_by {
            ContributorRecipientsSortBy::CommitteeName => "cm.name",
            ContributorRecipientsSortBy::TotalAmount => "mv.total_amount",
            ContributorRecipientsSortBy::ContributionCount => "mv.contribution_count",
            ContributorRecipientsSortBy::FirstDate => "mv.first_contribution_date",
            ContributorRecipientsSortBy::LastDate => "mv.last_contribution_date",
        };
        let sql = format!(
            "SELECT cm.id, cm.name, cm.committee_type, cm.state, cm.party, \
             mv.contribution_count, mv.total_amount, mv.first_contribution_date, \
             mv.last_contribution_date \
             FROM mv_contributor_committee_stats mv JOIN committee cm ON cm.id = mv.committee_id \
             WHERE mv.contributor_id = {} ORDER BY {} {}",
            p,
            column,
            self.sort_direction.as_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }

    pub fn count_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let p = b.bind(self.contributor_id);
        let sql = format!(
            "SELECT COUNT(*) FROM mv_contributor_committee_stats WHERE contributor_id = {}",
            p
        );
        SqlStatement::new(sql, b)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContributorRecipientsSortBy {
    CommitteeName,
    #[default]
    TotalAmount,
    ContributionCount,
    FirstDate,
    LastDate,
}
impl FromStr for ContributorRecipientsSortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "committee_name" => Ok(ContributorRecipientsSortBy::CommitteeName),
            "total_amount" => Ok(ContributorRecipientsSortBy::TotalAmount),
            "contribution_count" => Ok(ContributorRecipientsSortBy::ContributionCount),
            "first_date" => Ok(ContributorRecipientsSortBy::FirstDate),
            "last_date" => Ok(ContributorRecipientsSortBy::LastDate),
            _ => Err(Error::InvalidSortBy {
                value: s.to_string(),
                allowed: "committee_name, total_amount, contribution_count, first_date, last_date",
            }),
        }
    }
}
