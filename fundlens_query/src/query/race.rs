use crate::sql::{squish, Bindings, SqlStatement, WhereClause};

/// An electoral contest identified by office and geography.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Race {
    Presidential,
    Senate { state: String },
    House { state: String, district: String },
}

impl Race {
    /// Single-letter office code stored on candidates.
    pub fn office(&self) -> &'static str {
        match self {
            Race::Presidential => "P",
            Race::Senate { .. } => "S",
            Race::House { .. } => "H",
        }
    }
}

/// Candidates in one race with totals read from `mv_candidate_stats`.
#[derive(Clone, Debug)]
pub struct RaceQuery {
    pub race: Race,
    pub include_stats: bool,
}

impl RaceQuery {
    pub fn new(race: Race) -> Self {
        Self {
            race,
            include_stats: true,
        }
    }

    pub fn with_stats(mut self, include_stats: bool) -> Self {
        self.include_stats = include_stats;
        self
    }

    fn filters(&self, b: &mut Bindings) -> WhereClause {
        let mut w = WhereClause::new();
        let p = b.bind(self.race.office());
        w.push(format!("c.office = {}", p));
        match &self.race {
            Race::Presidential => {}
            Race::Senate { state } => {
                let p = b.bind(state);
                w.push(format!("c.state = {}", p));
            }
            Race::House { state, district } => {
                let p = b.bind(state);
                w.push(format!("c.state = {}", p));
                let p = b.bind(district);
                w.push(format!("c.district = {}", p));
            }
        }
        w
    }

    /// Active candidates first, then by name. Columns: `id, name, party,
    /// is_active, total_contributions, total_amount, unique_contributors,
    /// avg_contribution` (stats NULL when the view has no row).
    pub fn candidates_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let sql = format!(
            "SELECT c.id, c.name, c.party, c.is_active, mv.total_contributions, \
             mv.total_amount, mv.unique_contributors, mv.avg_contribution \
             FROM candidate c LEFT JOIN mv_candidate_stats mv ON mv.candidate_id = c.id \
             {} ORDER BY c.is_active DESC, c.name",
            filters.to_where_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }

    /// Columns: `total_candidates, active_candidates, total_amount_raised,
    /// total_contributions, unique_contributors`.
    pub fn summary_statement(&self) -> SqlStatement {
        let mut b = Bindings::new();
        let filters = self.filters(&mut b);
        let sql = format!(
            "SELECT COUNT(DISTINCT c.id), \
             COALESCE(SUM(CASE WHEN c.is_active = 1 THEN 1 ELSE 0 END), 0), \
             COALESCE(SUM(mv.total_amount), 0), COALESCE(SUM(mv.total_contributions), 0), \
             COALESCE(SUM(mv.unique_contributors), 0) \
             FROM candidate c LEFT JOIN mv_candidate_stats mv ON mv.candidate_id = c.id {}",
            filters.to_where_sql()
        );
        SqlStatement::new(squish(&sql), b)
    }
}
