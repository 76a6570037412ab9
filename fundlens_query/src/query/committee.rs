use std::str::FromStr;

use crate::sql::{squish, Bindings, SqlStatement, WhereClause};
use crate::Error;

use super::{
    common::{QueryCommon, SortDirection},
    Query,
};

const COMMITTEE_COLUMNS: &str =
    "cm.id, cm.name, cm.committee_type, cm.party, cm.state, cm.city, cm.is_active, cm.candidate_id";

const COMMITTEE_STATS_SUBQUERY: &str = "SELECT recipient_committee_id AS committee_id, \
     COUNT(id) AS total_contributions_received, \
     COALESCE(SUM(amount), 0) AS total_amount_received, \
     COUNT(DISTINCT contributor_id) AS unique_contributors, \
     COALESCE(AVG(amount), 0) AS avg_contribution \
     FROM contribution GROUP BY recipient_committee_id";

#[derive(Clone, Debug)]
pub struct CommitteeQuery {
    pub common: QueryCommon,
    pub search: Option<String>,
    pub state: Option<String>,
    pub committee_type: Option<String>,
    pub party: Option<String>,
    pub is_active: Option<bool>,
    pub candidate_id: Option<i64>,
    pub include_stats: bool,
    /// Only applied when stats are included.
    pub min_total_received: Option<f64>,
    pub sort_by: CommitteeSortBy,
}

impl Default for CommitteeQuery {
    fn default() -> Self {
        Self {
            common: QueryCommon {
                sort_direction: SortDirection::Asc,
                ..QueryCommon::default()
            },
            search: None,
            state: None,
            committee_type: None,
            party: None,
            is_active: None,
            candidate_id: None,
            include_stats: false,
            min_total_received: None,
            sort_by: CommitteeSortBy::default(),
        }
    }
}

impl Query for CommitteeQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn common(&self) -> &QueryCommon {
        &self.common
    }
}

impl CommitteeQuery {
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn with_committee_type(mut self, committee_type: &str) -> Self {
        self.committee_type = Some(committee_type.to_string());
        self
    }

    pub fn with_party(mut self, party: &str) -> Self {
        self.party = Some(party.to_string());
        self
    }

    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn with_candidate_id(mut self, candidate_id: i64) -> Self {
        self.candidate_id = Some(candidate_id);
        self
    }

    pub fn with_stats(mut self, include_stats: bool) -> Self {
        self.include_stats = include_stats;
        self
    }

    pub fn with_min_total_received(mut self, min_total_received: f64) -> Self {
        self.min_total_received = Some(min_total_received);
        self
    }

    pub fn with_sort_by(mut self, sort_by: CommitteeSortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    fn stats_join(&self) -> String {
        if self.include_stats {
            format!(" LEFT JOIN ({}) s ON s.committee_id = cm.id", COMMITTEE_STATS_SUBQUERY)
        } else {
            String::new()
        }
    }

    fn filters(&self, b: &mut Bindings) -> WhereClause {
        let mut w = WhereClause::new();
        if let Some(ref search) = self.search {
            let p = b.bind_contains(search);
            w.push(format!("cm.name LIKE {}", p));
        }
        if let Some(ref state) = self.state {
            let p = b.bind(state);
            w.push(format!("cm.state = {}", p));
        }
        if let Some(ref committee_type) = self.committee_type {
            let p = b.bind(committee_type);
            w.push(format!("cm.committee_type = {}", p));
        }
        if let Some(ref party) = self.party {
            let p = b.bind(party);
            w.push(format!("cm.party = {}", p));
        }
        if let Some(is_active) = self.is_active {
            let p = b.bind(is_active);
            w.push(format!("cm.is_active = {}", p));
        }
        if let Some(candidate_id) = self.candidate_id {
            let p = b.bind(candidate_id);
            w.push(format!("cm.candidate_id = {}", p));
        }
        if self.include_stats {
            if let Some(min) = self.min_total_received {
                let p = b.bind(min);
                w.push(format!("s.total_amount_received >= {}", p));
            }
        }
        w
    }

    fn order_sql(&self) -> String {
        let dir = self.common.sort_direction.as_sql();
        match (self.include_stats, self.sort_by) {
            (true, CommitteeSortBy::TotalReceived) => {
                format!("s.total_amount_received {} NULLS LAST, cm.name ASC", dir)
            }
            (true, CommitteeSortBy::TotalContributions) => {
                format!("s.total_contributions_received {} NULLS LAST, cm.name ASC", dir)
            }
            _ => format!("cm.name {}", dir),
        }
    }

    /// Page of committees. Columns: the eight committee columns, then
    /// `total_contributions_received, total_amount_received, unique_contributors,
    /// avg_contribution` (NULL without stats).
    pub fn select_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let stats_cols = if self.include_stats {
            "s.total_contributions_received, s.total_amount_received, s.unique_contributors, s.avg_contribution"
        } else {
            "NULL, NULL, NULL, NULL"
        };
        let sql = format!(
            "SELECT {}, {} FROM committee cm{} {} ORDER BY {}{}",
            COMMITTEE_COLUMNS,
            stats_cols,
            self.stats_join(),
            filters.to_where_sql(),
            self.order_sql(),
            self.common.limit_offset_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }

    pub fn count_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let sql = format!(
            "SELECT COUNT(*) FROM committee cm{} {}",
            self.stats_join(),
            filters.to_where_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }

    /// Live received-contribution stats for one committee. Always yields one row.
    pub fn stats_statement(committee_id: i64) -> SqlStatement {
        let mut b = Bindings::new();
        let p = b.bind(committee_id);
        let sql = format!(
            "SELECT COUNT(id), COALESCE(SUM(amount), 0), COUNT(DISTINCT contributor_id), \
             COALESCE(AVG(amount), 0) FROM contribution WHERE recipient_committee_id = {}",
            p
        );
        SqlStatement::new(sql, b)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommitteeSortBy {
    #[default]
    Name,
    TotalReceived,
    TotalContributions,
}
impl std::fmt::Display for CommitteeSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CommitteeSortBy::Name => "name",
                CommitteeSortBy::TotalReceived => "total_received",
                CommitteeSortBy::TotalContributions => "total_contributions",
            }
        )?;
        Ok(())
    }
}
impl FromStr for CommitteeSortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(CommitteeSortBy::Name),
            "total_received" => Ok(CommitteeSortBy::TotalReceived),
            "total_contributions" => Ok(CommitteeSortBy::TotalContributions),
            _ => Err(Error::InvalidSortBy {
                value: s.to_string(),
                allowed: "name, total_received, total_contributions",
            }),
        }
    }
}
