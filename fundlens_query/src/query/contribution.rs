use chrono::NaiveDate;

use crate::sql::{squish, Bindings, SqlStatement, WhereClause};

use super::{common::QueryCommon, Query};

pub const CONTRIBUTION_COLUMNS: &str = "x.id, x.contribution_date, x.amount, \
     x.contribution_type, x.election_type, x.election_year, x.election_cycle, \
     x.contributor_id, x.recipient_committee_id, x.recipient_candidate_id, x.source_system";

#[derive(Clone, Debug, Default)]
pub struct ContributionQuery {
    pub common: QueryCommon,
    pub contributor_id: Option<i64>,
    pub recipient_committee_id: Option<i64>,
    pub recipient_candidate_id: Option<i64>,
    pub contribution_type: Option<String>,
    pub election_type: Option<String>,
    pub election_year: Option<i64>,
    pub election_cycle: Option<i64>,
    pub source_system: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl Query for ContributionQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }
    fn common(&self) -> &QueryCommon {
        &self.common
    }
}

impl ContributionQuery {
    pub fn with_contributor_id(mut self, contributor_id: i64) -> Self {
        self.contributor_id = Some(contributor_id);
        self
    }

    pub fn with_recipient_committee_id(mut self, committee_id: i64) -> Self {
        self.recipient_committee_id = Some(committee_id);
        self
    }

    pub fn with_recipient_candidate_id(mut self, candidate_id: i64) -> Self {
        self.recipient_candidate_id = Some(candidate_id);
        self
    }

    pub fn with_contribution_type(mut self, contribution_type: &str) -> Self {
        self.contribution_type = Some(contribution_type.to_string());
        self
    }

    pub fn with_election_type(mut self, election_type: &str) -> Self {
        self.election_type = Some(election_type.to_string());
        self
    }

    pub fn with_election_year(mut self, year: i64) -> Self {
        self.election_year = Some(year);
        self
    }

    pub fn with_election_cycle(mut self, cycle: i64) -> Self {
        self.election_cycle = Some(cycle);
        self
    }

    pub fn with_source_system(mut self, source_system: &str) -> Self {
        self.source_system = Some(source_system.to_string());
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

    pub fn with_min_amount(mut self, min_amount: f64) -> Self {
        self.min_amount = Some(min_amount);
        self
    }

    pub fn with_max_amount(mut self, max_amount: f64) -> Self {
        self.max_amount = Some(max_amount);
        self
    }

    fn filters(&self, b: &mut Bindings) -> WhereClause {
        let mut w = WhereClause::new();
        let ids = [
            ("x.contributor_id", self.contributor_id),
            ("x.recipient_committee_id", self.recipient_committee_id),
            ("x.recipient_candidate_id", self.recipient_candidate_id),
            ("x.election_year", self.election_year),
            ("x.election_cycle", self.election_cycle),
        ];
        for (column, value) in ids {
            if let Some(v) = value {
                let p = b.bind(v);
                w.push(format!("{} = {}", column, p));
            }
        }
        let texts = [
            ("x.contribution_type", &self.contribution_type),
            ("x.election_type", &self.election_type),
            ("x.source_system", &self.source_system),
        ];
        for (column, value) in texts {
            if let Some(v) = value {
                let p = b.bind(v);
                w.push(format!("{} = {}", column, p));
            }
        }
        if let Some(start) = self.start_date {
            let p = b.bind(start.to_string());
            w.push(format!("x.contribution_date >= {}", p));
        }
        if let Some(end) = self.end_date {
            let p = b.bind(end.to_string());
            w.push(format!("x.contribution_date <= {}", p));
        }
        if let Some(min) = self.min_amount {
            let p = b.bind(min);
            w.push(format!("x.amount >= {}", p));
        }
        if let Some(max) = self.max_amount {
            let p = b.bind(max);
            w.push(format!("x.amount <= {}", p));
        }
        w
    }

    /// Newest first.
    pub fn select_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let sql = format!(
            "SELECT {} FROM contribution x {} ORDER BY x.contribution_date DESC, x.id DESC{}",
            CONTRIBUTION_COLUMNS,
            filters.to_where_sql(),
            self.common.limit_offset_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }

    pub fn count_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let sql = format!("SELECT COUNT(*) FROM contribution x {}", filters.to_where_sql());
        SqlStatement::new(sql, b)
    }

    /// Columns: `total_contributions, total_amount, avg_contribution,
    /// min_contribution, max_contribution`, each zero when nothing matches.
    pub fn summary_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let sql = format!(
            "SELECT COUNT(x.id), COALESCE(SUM(x.amount), 0), COALESCE(AVG(x.amount), 0), \
             COALESCE(MIN(x.amount), 0), COALESCE(MAX(x.amount), 0) FROM contribution x {}",
            filters.to_where_sql()
        );
        SqlStatement::new(sql, b)
    }

    /// One contribution joined to its contributor, committee and candidate.
    pub fn detail_statement(contribution_id: i64) -> SqlStatement {
        let mut b = Bindings::new();
        let p = b.bind(contribution_id);
        let sql = format!(
            "SELECT {}, x.source_transaction_id, x.memo_text, x.created_at, x.updated_at, \
             ct.name, ct.city, ct.state, cm.name, cm.committee_type, \
             cd.name, cd.office, cd.state \
             FROM contribution x \
             JOIN contributor ct ON ct.id = x.contributor_id \
             JOIN committee cm ON cm.id = x.recipient_committee_id \
             LEFT JOIN candidate cd ON cd.id = x.recipient_candidate_id \
             WHERE x.id = {}",
            CONTRIBUTION_COLUMNS, p
        );
        SqlStatement::new(squish(&sql), b)
    }
}
