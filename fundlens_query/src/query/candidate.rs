use std::str::FromStr;

use crate::sql::{squish, Bindings, SqlStatement, WhereClause};
use crate::Error;

use super::{
    common::{QueryCommon, SortDirection},
    Query,
};

/// Offices that make a candidate "federal".
pub const FEDERAL_OFFICES: &[&str] = &["H", "S", "P"];

const CANDIDATE_COLUMNS: &str =
    "c.id, c.name, c.office, c.state, c.district, c.party, c.is_active";

/// Live per-candidate aggregate, joined as `s`.
const CANDIDATE_STATS_SUBQUERY: &str = "SELECT recipient_candidate_id AS candidate_id, \
     COUNT(id) AS total_contributions, \
     COALESCE(SUM(amount), 0) AS total_amount, \
     COUNT(DISTINCT contributor_id) AS unique_contributors, \
     COALESCE(AVG(amount), 0) AS avg_contribution \
     FROM contribution WHERE recipient_candidate_id IS NOT NULL \
     GROUP BY recipient_candidate_id";

/// Candidates that have raised a positive total.
const FUNDRAISING_SUBQUERY: &str = "SELECT recipient_candidate_id FROM contribution \
     WHERE recipient_candidate_id IS NOT NULL \
     GROUP BY recipient_candidate_id HAVING SUM(amount) > 0";

/// Federal (H/S/P) versus state-level offices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OfficeLevel {
    Federal,
    State,
}

impl FromStr for OfficeLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "federal" => Ok(OfficeLevel::Federal),
            "state" => Ok(OfficeLevel::State),
            _ => Err(Error::Unsupported(format!(
                "level must be 'federal' or 'state', got '{}'",
                s
            ))),
        }
    }
}

/// How candidate rows are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CandidateOrdering {
    /// Alphabetical by name, direction ignored.
    #[default]
    Name,
    /// Sorted by `sort_by` and the query direction; office then name when
    /// sorting by name or when stats are not joined.
    Ranked,
}

#[derive(Clone, Debug)]
pub struct CandidateQuery {
    pub common: QueryCommon,
    pub search: Option<String>,
    pub state: Option<String>,
    pub offices: Vec<String>,
    pub parties: Vec<String>,
    pub district: Option<String>,
    pub is_active: Option<bool>,
    pub level: Option<OfficeLevel>,
    pub has_fundraising: bool,
    pub include_stats: bool,
    /// Only applied when stats are included.
    pub min_total_amount: Option<f64>,
    pub sort_by: CandidateSortBy,
    pub ordering: CandidateOrdering,
}

impl Default for CandidateQuery {
    fn default() -> Self {
        Self {
            common: QueryCommon::default(),
            search: None,
            state: None,
            offices: Vec::new(),
            parties: Vec::new(),
            district: None,
            is_active: None,
            level: None,
            has_fundraising: false,
            include_stats: false,
            min_total_amount: None,
            sort_by: CandidateSortBy::default(),
            ordering: CandidateOrdering::default(),
        }
    }
}

impl Query for CandidateQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn common(&self) -> &QueryCommon {
        &self.common
    }
}

impl CandidateQuery {
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn with_office(mut self, office: &str) -> Self {
        self.offices.push(office.to_string());
        self
    }
    pub fn with_offices(mut self, offices: &[String]) -> Self {
        self.offices.extend_from_slice(offices);
        self
    }

    pub fn with_party(mut self, party: &str) -> Self {
        self.parties.push(party.to_string());
        self
    }
    pub fn with_parties(mut self, parties: &[String]) -> Self {
        self.parties.extend_from_slice(parties);
        self
    }

    pub fn with_district(mut self, district: &str) -> Self {
        self.district = Some(district.to_string());
        self
    }

    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn with_level(mut self, level: OfficeLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_has_fundraising(mut self, has_fundraising: bool) -> Self {
        self.has_fundraising = has_fundraising;
        self
    }

    pub fn with_stats(mut self, include_stats: bool) -> Self {
        self.include_stats = include_stats;
        self
    }

    pub fn with_min_total_amount(mut self, min_total_amount: f64) -> Self {
        self.min_total_amount = Some(min_total_amount);
        self
    }

    pub fn with_sort_by(mut self, sort_by: CandidateSortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_ordering(mut self, ordering: CandidateOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    fn stats_join(&self) -> String {
        if self.include_stats {
            format!(" LEFT JOIN ({}) s ON s.candidate_id = c.id", CANDIDATE_STATS_SUBQUERY)
        } else {
            String::new()
        }
    }

    fn filters(&self, b: &mut Bindings) -> WhereClause {
        let mut w = WhereClause::new();
        if let Some(ref search) = self.search {
            let p = b.bind_contains(search);
            w.push(format!("c.name LIKE {}", p));
        }
        if let Some(ref state) = self.state {
            let p = b.bind(state);
            w.push(format!("c.state = {}", p));
        }
        w.push_any_of("c.office", &self.offices, b);
        w.push_any_of("c.party", &self.parties, b);
        if let Some(ref district) = self.district {
            let p = b.bind(district);
            w.push(format!("c.district = {}", p));
        }
        if let Some(is_active) = self.is_active {
            let p = b.bind(is_active);
            w.push(format!("c.is_active = {}", p));
        }
        let federal = || {
            FEDERAL_OFFICES
                .iter()
                .map(|o| format!("'{}'", o))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self.level {
            Some(OfficeLevel::Federal) => w.push(format!("c.office IN ({})", federal())),
            Some(OfficeLevel::State) => w.push(format!("c.office NOT IN ({})", federal())),
            None => {}
        }
        if self.has_fundraising {
            w.push(format!("c.id IN ({})", FUNDRAISING_SUBQUERY));
        }
        if self.include_stats {
            if let Some(min) = self.min_total_amount {
                let p = b.bind(min);
                w.push(format!("s.total_amount >= {}", p));
            }
        }
        w
    }

    fn order_sql(&self) -> String {
        let dir = self.common.sort_direction.as_sql();
        match self.ordering {
            CandidateOrdering::Name => "c.name ASC".to_string(),
            CandidateOrdering::Ranked => match (self.include_stats, self.sort_by) {
                (true, CandidateSortBy::TotalAmount) => {
                    format!("s.total_amount {} NULLS LAST, c.name", dir)
                }
                (true, CandidateSortBy::TotalContributions) => {
                    format!("s.total_contributions {} NULLS LAST, c.name", dir)
                }
                _ => match self.common.sort_direction {
                    SortDirection::Desc => "c.office DESC, c.name DESC".to_string(),
                    SortDirection::Asc => "c.office, c.name".to_string(),
                },
            },
        }
    }

    /// Page of candidates. Columns: the seven candidate columns, then
    /// `total_contributions, total_amount, unique_contributors, avg_contribution`
    /// (all NULL when stats are not included or the candidate has none).
    pub fn select_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let stats_cols = if self.include_stats {
            "s.total_contributions, s.total_amount, s.unique_contributors, s.avg_contribution"
        } else {
            "NULL, NULL, NULL, NULL"
        };
        let sql = format!(
            "SELECT {}, {} FROM candidate c{} {} ORDER BY {}{}",
            CANDIDATE_COLUMNS,
            stats_cols,
            self.stats_join(),
            filters.to_where_sql(),
            self.order_sql(),
            self.common.limit_offset_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }

    /// Total rows matching the filters, ignoring pagination.
    pub fn count_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let sql = format!(
            "SELECT COUNT(*) FROM candidate c{} {}",
            self.stats_join(),
            filters.to_where_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }

    /// Live stats for the given candidate ids. Candidates with no
    /// contributions produce no row.
    pub fn stats_statement(candidate_ids: &[i64]) -> SqlStatement {
        let mut b = Bindings::new();
        let ids = b.bind_list(candidate_ids.iter().copied());
        let sql = format!(
            "SELECT recipient_candidate_id, COUNT(id), COALESCE(SUM(amount), 0), \
             COUNT(DISTINCT contributor_id), COALESCE(AVG(amount), 0) \
             FROM contribution WHERE recipient_candidate_id IN ({}) \
             GROUP BY recipient_candidate_id",
            ids
        );
        SqlStatement::new(sql, b)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CandidateSortBy {
    #[default]
    Name,
    TotalAmount,
    TotalContributions,
}
impl std::fmt::Display for CandidateSortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CandidateSortBy::Name => "name",
                CandidateSortBy::TotalAmount => "total_amount",
                CandidateSortBy::TotalContributions => "total_contributions",
            }
        )?;
        Ok(())
    }
}
impl FromStr for CandidateSortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(CandidateSortBy::Name),
            "total_amount" => Ok(CandidateSortBy::TotalAmount),
            "total_contributions" => Ok(CandidateSortBy::TotalContributions),
            _ => Err(Error::InvalidSortBy {
                value: s.to_string(),
                allowed: "name, total_amount, total_contributions",
            }),
        }
    }
}
