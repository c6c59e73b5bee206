//! Analytics engine using DuckDB for the record table and grouped queries.

use std::path::Path;

use dash_domain::{AggregatedView, Cell};
use duckdb::{params_from_iter, Connection, Row};
use tracing::{debug, info};

use crate::error::{AnalyticsError, Result};
use crate::queries::{self, quote_ident, quote_literal, Aggregation, Filter, SqlQuery};
use crate::schema::{ColumnType, TableSchema};

/// Read-only record table held in an in-memory DuckDB database.
///
/// The table is created once from a CSV file; afterwards the engine only
/// issues `SELECT` statements, so the data never changes.
pub struct AnalyticsEngine {
    pub(crate) conn: Connection,
    schema: &'static TableSchema,
}

impl AnalyticsEngine {
    /// Ingest a CSV file described by `schema`.
    ///
    /// Fails if the file cannot be read or lacks a required column.
    pub fn load_csv<P: AsRef<Path>>(schema: &'static TableSchema, path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(AnalyticsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} data file not found: {}", schema.dataset, path.display()),
            )));
        }

        let conn = Connection::open_in_memory()?;
        let engine = Self { conn, schema };
        engine.ingest(path)?;

        info!(
            dataset = schema.dataset,
            path = %path.display(),
            rows = engine.row_count()?,
            "Record table loaded"
        );
        Ok(engine)
    }

    fn ingest(&self, path: &Path) -> Result<()> {
        let staging = format!("{}_staging", self.schema.table);
        let encoding = self
            .schema
            .encoding
            .map(|e| format!(", encoding = {}", quote_literal(e)))
            .unwrap_or_default();

        // Everything is staged as text; declared columns are cast below.
        self.conn.execute_batch(&format!(
            "CREATE TABLE {} AS SELECT * FROM read_csv({}, header = true, all_varchar = true{encoding})",
            quote_ident(&staging),
            quote_literal(&path.to_string_lossy()),
        ))?;

        let present = self.table_columns(&staging)?;
        let missing: Vec<String> = self
            .schema
            .columns
            .iter()
            .filter(|c| c.required && !present.iter().any(|p| p == c.name))
            .map(|c| c.name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AnalyticsError::MissingColumns {
                dataset: self.schema.dataset.to_string(),
                columns: missing,
            });
        }

        let projection = self
            .schema
            .columns
            .iter()
            .map(|c| {
                let col = quote_ident(c.name);
                if present.iter().any(|p| p == c.name) {
                    format!("TRY_CAST({col} AS {}) AS {col}", c.ty.sql())
                } else {
                    format!("CAST(NULL AS {}) AS {col}", c.ty.sql())
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        self.conn.execute_batch(&format!(
            "CREATE TABLE {table} AS SELECT {projection} FROM {staging}; DROP TABLE {staging};",
            table = quote_ident(self.schema.table),
            staging = quote_ident(&staging),
        ))?;
        Ok(())
    }

    fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT name FROM pragma_table_info({}) ORDER BY cid",
            quote_literal(table)
        ))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AnalyticsError::from)
    }

    /// Schema of the loaded table.
    #[must_use]
    pub const fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    /// Number of rows in the record table.
    pub fn row_count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(self.schema.table)),
            [],
            |row| row.get(0),
        )?;
        usize::try_from(count).map_err(|e| AnalyticsError::Conversion(e.to_string()))
    }

    /// Non-null values of a column in order of first appearance.
    pub fn distinct_values(&self, column: &str) -> Result<Vec<Cell>> {
        let ty = self.column_type(column)?;
        let col = quote_ident(column);
        self.execute(SqlQuery {
            sql: format!(
                "SELECT {col} FROM {} WHERE {col} IS NOT NULL GROUP BY {col} ORDER BY MIN(rowid)",
                quote_ident(self.schema.table)
            ),
            params: Vec::new(),
            columns: vec![column.to_string()],
            types: vec![ty],
        })
        .map(|view| view.rows.into_iter().filter_map(|mut r| r.pop()).collect())
    }

    /// Minimum and maximum of a numeric column, `None` when it has no values.
    pub fn bounds(&self, column: &str) -> Result<Option<(f64, f64)>> {
        if !self.column_type(column)?.is_numeric() {
            return Err(AnalyticsError::InvalidParameter(format!(
                "'{column}' is not a numeric column"
            )));
        }
        let col = quote_ident(column);
        let (min, max): (Option<f64>, Option<f64>) = self.conn.query_row(
            &format!(
                "SELECT CAST(MIN({col}) AS DOUBLE), CAST(MAX({col}) AS DOUBLE) FROM {}",
                quote_ident(self.schema.table)
            ),
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(min.zip(max))
    }

    /// Filtered rows projected onto `columns`, in file order.
    pub fn select(&self, columns: &[&str], filter: &Filter) -> Result<AggregatedView> {
        self.execute(queries::build_select(self.schema, columns, filter)?)
    }

    /// Filtered rows grouped and reduced per `aggregation`.
    pub fn aggregate(&self, filter: &Filter, aggregation: &Aggregation) -> Result<AggregatedView> {
        self.execute(queries::build_aggregate(self.schema, filter, aggregation)?)
    }

    fn column_type(&self, column: &str) -> Result<ColumnType> {
        self.schema
            .column(column)
            .map(|c| c.ty)
            .ok_or_else(|| AnalyticsError::UnknownColumn {
                dataset: self.schema.dataset.to_string(),
                column: column.to_string(),
            })
    }

    fn execute(&self, query: SqlQuery) -> Result<AggregatedView> {
        let SqlQuery {
            sql,
            params,
            columns,
            types,
        } = query;
        debug!(dataset = self.schema.dataset, %sql, params = params.len(), "Executing query");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(params))?;
        let mut view = AggregatedView::new(columns);

        while let Some(row) = rows.next()? {
            let cells = types
                .iter()
                .enumerate()
                .map(|(idx, ty)| read_cell(row, idx, *ty))
                .collect::<duckdb::Result<Vec<_>>>()?;
            view.push_row(cells);
        }

        Ok(view)
    }
}

fn read_cell(row: &Row<'_>, idx: usize, ty: ColumnType) -> duckdb::Result<Cell> {
    Ok(match ty {
        ColumnType::Int => row.get::<_, Option<i64>>(idx)?.into(),
        ColumnType::Float => row.get::<_, Option<f64>>(idx)?.into(),
        ColumnType::Text => row.get::<_, Option<String>>(idx)?.into(),
    })
}
