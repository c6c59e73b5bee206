//! Filter predicates and grouped aggregations, compiled to DuckDB SQL.
//!
//! Row inclusion is the conjunction of every predicate in a [`Filter`].
//! An aggregation groups on one or two columns and reduces exactly one.

use dash_domain::{Cell, Selection};
use duckdb::types::Value;

use crate::error::{AnalyticsError, Result};
use crate::schema::{ColumnType, TableSchema};

/// A single row predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column = value`
    Equals {
        /// Column name
        column: String,
        /// Required value
        value: Cell,
    },
    /// `low <= column <= high`
    Between {
        /// Column name
        column: String,
        /// Inclusive lower bound
        low: f64,
        /// Inclusive upper bound
        high: f64,
    },
    /// `column` differs from `value`; NULL counts as different.
    DistinctFrom {
        /// Column name
        column: String,
        /// Excluded value
        value: Cell,
    },
    /// `column IS NOT NULL`
    NotNull {
        /// Column name
        column: String,
    },
}

impl Predicate {
    fn column(&self) -> &str {
        match self {
            Self::Equals { column, .. }
            | Self::Between { column, .. }
            | Self::DistinctFrom { column, .. }
            | Self::NotNull { column } => column,
        }
    }
}

/// Conjunction of predicates. An empty filter passes every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Pass-through filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require an exact match.
    #[must_use]
    pub fn equals(mut self, column: &str, value: impl Into<Cell>) -> Self {
        self.predicates.push(Predicate::Equals {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    /// Require closed-interval membership.
    #[must_use]
    pub fn between(mut self, column: &str, low: f64, high: f64) -> Self {
        self.predicates.push(Predicate::Between {
            column: column.to_string(),
            low,
            high,
        });
        self
    }

    /// Exclude one value, keeping NULLs.
    #[must_use]
    pub fn distinct_from(mut self, column: &str, value: impl Into<Cell>) -> Self {
        self.predicates.push(Predicate::DistinctFrom {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    /// Drop rows where `column` is NULL.
    #[must_use]
    pub fn not_null(mut self, column: &str) -> Self {
        self.predicates.push(Predicate::NotNull {
            column: column.to_string(),
        });
        self
    }

    /// Exact match when a specific value is selected, nothing for `All`.
    #[must_use]
    pub fn selected<T>(self, column: &str, selection: &Selection<T>) -> Self
    where
        T: Clone + Into<Cell>,
    {
        match selection {
            Selection::All => self,
            Selection::Specific(value) => self.equals(column, value.clone()),
        }
    }

    /// Predicates in insertion order.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    /// Whether the filter passes every row.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// Reducer applied to the aggregated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// Sum of non-null values; 0 for an all-null group
    Sum,
    /// Mean of non-null values; NULL for an all-null group
    Mean,
    /// Number of rows in the group
    Count,
}

/// Output column name of a count aggregation.
pub const COUNT_COLUMN: &str = "count";

/// `GROUP BY keys` reducing one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    keys: Vec<String>,
    reducer: Reducer,
    column: Option<String>,
}

impl Aggregation {
    /// Sum `column` per group.
    #[must_use]
    pub fn sum(column: &str) -> Self {
        Self::reduce(Reducer::Sum, Some(column))
    }

    /// Average `column` per group.
    #[must_use]
    pub fn mean(column: &str) -> Self {
        Self::reduce(Reducer::Mean, Some(column))
    }

    /// Count rows per group.
    #[must_use]
    pub fn count() -> Self {
        Self::reduce(Reducer::Count, None)
    }

    fn reduce(reducer: Reducer, column: Option<&str>) -> Self {
        Self {
            keys: Vec::new(),
            reducer,
            column: column.map(str::to_string),
        }
    }

    /// Group keys, outermost first.
    #[must_use]
    pub fn by<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.keys = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        self
    }

    /// Name of the reduced column in the result.
    #[must_use]
    pub fn output_column(&self) -> &str {
        self.column.as_deref().unwrap_or(COUNT_COLUMN)
    }
}

/// Compiled statement plus the column types needed to decode its rows.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
    pub columns: Vec<String>,
    pub types: Vec<ColumnType>,
}

/// Quote an identifier for DuckDB.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal for DuckDB.
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn cell_param(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Int(v) => Value::BigInt(*v),
        Cell::Float(v) => Value::Double(*v),
        Cell::Text(v) => Value::Text(v.clone()),
    }
}

fn column_type(schema: &TableSchema, column: &str) -> Result<ColumnType> {
    schema
        .column(column)
        .map(|c| c.ty)
        .ok_or_else(|| AnalyticsError::UnknownColumn {
            dataset: schema.dataset.to_string(),
            column: column.to_string(),
        })
}

fn where_clause(schema: &TableSchema, predicates: &[Predicate]) -> Result<(String, Vec<Value>)> {
    let mut clauses = Vec::with_capacity(predicates.len());
    let mut params = Vec::new();

    for predicate in predicates {
        column_type(schema, predicate.column())?;
        let col = quote_ident(predicate.column());
        match predicate {
            Predicate::Equals { value, .. } => {
                clauses.push(format!("{col} = ?"));
                params.push(cell_param(value));
            }
            Predicate::Between { low, high, .. } => {
                clauses.push(format!("{col} BETWEEN ? AND ?"));
                params.push(Value::Double(*low));
                params.push(Value::Double(*high));
            }
            Predicate::DistinctFrom { value, .. } => {
                clauses.push(format!("{col} IS DISTINCT FROM ?"));
                params.push(cell_param(value));
            }
            Predicate::NotNull { .. } => clauses.push(format!("{col} IS NOT NULL")),
        }
    }

    if clauses.is_empty() {
        Ok((String::new(), params))
    } else {
        Ok((format!(" WHERE {}", clauses.join(" AND ")), params))
    }
}

/// Row projection in table order.
pub(crate) fn build_select(
    schema: &TableSchema,
    columns: &[&str],
    filter: &Filter,
) -> Result<SqlQuery> {
    if columns.is_empty() {
        return Err(AnalyticsError::Query("projection needs at least one column".into()));
    }

    let types = columns
        .iter()
        .map(|c| column_type(schema, c))
        .collect::<Result<Vec<_>>>()?;
    let (where_sql, params) = where_clause(schema, filter.predicates())?;
    let projection = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(SqlQuery {
        sql: format!(
            "SELECT {projection} FROM {}{where_sql} ORDER BY rowid",
            quote_ident(schema.table)
        ),
        params,
        columns: columns.iter().map(|c| (*c).to_string()).collect(),
        types,
    })
}

/// Grouped aggregation. Rows with a NULL group key are dropped and groups
/// come back ordered by key.
pub(crate) fn build_aggregate(
    schema: &TableSchema,
    filter: &Filter,
    aggregation: &Aggregation,
) -> Result<SqlQuery> {
    if aggregation.keys.is_empty() {
        return Err(AnalyticsError::Query("aggregation needs at least one group key".into()));
    }

    let mut filter = filter.clone();
    for key in &aggregation.keys {
        filter = filter.not_null(key);
    }

    let mut types = aggregation
        .keys
        .iter()
        .map(|k| column_type(schema, k))
        .collect::<Result<Vec<_>>>()?;

    let (reduced, reduced_ty) = match (aggregation.reducer, aggregation.column.as_deref()) {
        (Reducer::Count, _) => ("COUNT(*)".to_string(), ColumnType::Int),
        (reducer, Some(column)) => {
            let ty = column_type(schema, column)?;
            if !ty.is_numeric() {
                return Err(AnalyticsError::InvalidParameter(format!(
                    "cannot aggregate text column '{column}'"
                )));
            }
            let col = quote_ident(column);
            match reducer {
                Reducer::Sum => (
                    format!("CAST(COALESCE(SUM({col}), 0) AS {})", ty.sql()),
                    ty,
                ),
                _ => (format!("AVG({col})"), ColumnType::Float),
            }
        }
        (_, None) => {
            return Err(AnalyticsError::Query(
                "sum and mean need a column to reduce".into(),
            ));
        }
    };
    types.push(reduced_ty);

    let (where_sql, params) = where_clause(schema, filter.predicates())?;
    let keys = aggregation
        .keys
        .iter()
        .map(|k| quote_ident(k))
        .collect::<Vec<_>>()
        .join(", ");

    let mut columns = aggregation.keys.clone();
    columns.push(aggregation.output_column().to_string());

    Ok(SqlQuery {
        sql: format!(
            "SELECT {keys}, {reduced} AS {} FROM {}{where_sql} GROUP BY {keys} ORDER BY {keys}",
            quote_ident(aggregation.output_column()),
            quote_ident(schema.table)
        ),
        params,
        columns,
        types,
    })
}
