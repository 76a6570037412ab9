use crate::sql::{squish, Bindings, SqlStatement};

/// Per-state roll-up of candidates and fundraising, read from `mv_candidate_stats`.
#[derive(Clone, Debug)]
pub struct StateSummaryQuery {
    pub state: String,
    /// Top fundraisers listed per office.
    pub top_n: i64,
}

impl StateSummaryQuery {
    pub fn new(state: &str) -> Self {
        Self {
            state: state.to_string(),
            top_n: 5,
        }
    }

    pub fn with_top_n(mut self, top_n: i64) -> Self {
        self.top_n = top_n;
        self
    }

    /// Columns: `total_candidates, active_candidates, total_raised,
    /// total_contributions, unique_contributors`.
    pub fn totals_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let p = b.bind(&self.state);
        let sql = format!(
            "SELECT COUNT(c.id), \
             COALESCE(SUM(CASE WHEN c.is_active = 1 THEN 1 ELSE 0 END), 0), \
             COALESCE(SUM(mv.total_amount), 0), COALESCE(SUM(mv.total_contributions), 0), \
             COALESCE(SUM(mv.unique_contributors), 0) \
             FROM candidate c LEFT JOIN mv_candidate_stats mv ON mv.candidate_id = c.id \
             WHERE c.state = {}",
            p
        );
        SqlStatement::new(squish(&sql), b)
    }

    /// One row per office, ordered by office code. Columns: `office,
    /// candidate_count, active_candidate_count, total_raised`.
    pub fn offices_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let p = b.bind(&self.state);
        let sql = format!(
            "SELECT c.office, COUNT(c.id), \
             COALESCE(SUM(CASE WHEN c.is_active = 1 THEN 1 ELSE 0 END), 0), \
             COALESCE(SUM(mv.total_amount), 0) \
             FROM candidate c LEFT JOIN mv_candidate_stats mv ON mv.candidate_id = c.id \
             WHERE c.state = {} GROUP BY c.office ORDER BY c.office",
            p
        );
        SqlStatement::new(squish(&sql), b)
    }

    /// Distinct non-null districts for an office, sorted.
    pub fn districts_statement(&self, office: &str) -> SqlStatement {
        let mut b = Bindings::new();
        let state = b.bind(&self.state);
        let office = b.bind(office);
        let sql = format!(
            "SELECT DISTINCT c.district FROM candidate c \
             WHERE c.state = {} AND c.office = {} AND c.district IS NOT NULL \
             ORDER BY c.district",
            state, office
        );
        SqlStatement::new(sql, b)
    }

    /// The office's highest-raising candidates. Columns: `id, name, office,
    /// state, district, party, is_active`.
    pub fn top_fundraisers_statement(&self, office: &str) -> SqlStatement {
        let mut b = Bindings::new();
        let state = b.bind(&self.state);
        let office = b.bind(office);
        let sql = format!(
            "SELECT c.id, c.name, c.office, c.state, c.district, c.party, c.is_active \
             FROM candidate c LEFT JOIN mv_candidate_stats mv ON mv.candidate_id = c.id \
             WHERE c.state = {} AND c.office = {} \
             ORDER BY COALESCE(mv.total_amount, 0) DESC, c.name LIMIT {}",
            state,
            office,
            self.top_n.clamp(1, 20)
        );
        SqlStatement::new(squish(&sql), b)
    }
}
