//! Parameterized SQL fragments shared by every query builder.
//!
//! Builders never interpolate user input into SQL text. Values are bound
//! through [`Bindings`], which hands out numbered `?N` placeholders, and
//! conditions are collected in a [`WhereClause`].

/// A value bound to a positional SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Integer(v)
    }
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Integer(v as i64)
    }
}

impl From<f64> for SqlParam {
    fn from(v: f64) -> Self {
        SqlParam::Real(v)
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Integer(v as i64)
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<&String> for SqlParam {
    fn from(v: &String) -> Self {
        SqlParam::Text(v.clone())
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlParam::Null)
    }
}

/// A finished statement: SQL text plus the values for its `?N` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl SqlStatement {
    pub fn new(sql: impl Into<String>, bindings: Bindings) -> Self {
        Self {
            sql: sql.into(),
            params: bindings.into_params(),
        }
    }
}

/// Accumulates bound values and returns their placeholders.
#[derive(Debug, Default, Clone)]
pub struct Bindings {
    params: Vec<SqlParam>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a value and returns its placeholder, e.g. `?3`.
    pub fn bind(&mut self, value: impl Into<SqlParam>) -> String {
        self.params.push(value.into());
        format!("?{}", self.params.len())
    }

    /// Binds `%value%` for a substring `LIKE` match.
    pub fn bind_contains(&mut self, value: &str) -> String {
        self.bind(format!("%{}%", value))
    }

    /// Binds every value and returns a comma-separated placeholder list.
    pub fn bind_list<T>(&mut self, values: impl IntoIterator<Item = T>) -> String
    where
        T: Into<SqlParam>,
    {
        values
            .into_iter()
            .map(|v| self.bind(v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn into_params(self) -> Vec<SqlParam> {
        self.params
    }
}

/// `AND`-joined conditions.
#[derive(Debug, Default, Clone)]
pub struct WhereClause {
    conditions: Vec<String>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, condition: impl Into<String>) {
        self.conditions.push(condition.into());
    }

    /// Adds `column = value`, or `column IN (...)` for several values.
    /// An empty slice adds nothing.
    pub fn push_any_of(&mut self, column: &str, values: &[String], bindings: &mut Bindings) {
        match values {
            [] => {}
            [one] => {
                let p = bindings.bind(one);
                self.push(format!("{} = {}", column, p));
            }
            many => {
                let list = bindings.bind_list(many.iter());
                self.push(format!("{} IN ({})", column, list));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Renders `WHERE a AND b`, or `WHERE 1=1` when no condition was pushed.
    pub fn to_where_sql(&self) -> String {
        if self.conditions.is_empty() {
            "WHERE 1=1".to_string()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Renders `HAVING a AND b`, or nothing.
    pub fn to_having_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" HAVING {}", self.conditions.join(" AND "))
        }
    }
}

/// Excludes earmark receipts and conduit pass-through rows so that
/// contributions are not double counted. `alias` is the contribution table alias.
pub fn earmark_exclusion(alias: &str) -> String {
    format!(
        "{a}.is_earmark_receipt = 0 \
         AND {a}.source_transaction_id NOT LIKE '%E' \
         AND UPPER(COALESCE({a}.memo_text, '')) NOT LIKE '%EARMARK%' \
         AND UPPER(COALESCE({a}.memo_text, '')) NOT LIKE '%CONDUIT%' \
         AND UPPER(COALESCE({a}.memo_text, '')) NOT LIKE '%ATTRIBUTION BELOW%'",
        a = alias
    )
}

/// Collapses runs of whitespace so generated SQL reads on one line.
pub fn squish(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}
