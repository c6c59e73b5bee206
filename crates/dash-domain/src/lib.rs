//! # Analytics Dashboards - Domain Model
//!
//! Selection state, control panel descriptions, aggregated views and chart
//! specifications shared by the analytics engine and the HTTP service.
//! Nothing in here knows about DuckDB, axum or any charting library.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label the launch site dropdown shows for the "every site" entry.
pub const ALL_SITES_LABEL: &str = "All Sites";

/// Years offered by the airline dashboard's year dropdown.
pub const AIRLINE_YEARS: RangeInclusive<i32> = 2005..=2019;

// =============================================================================
// SELECTION
// =============================================================================

/// A categorical selector value.
///
/// `All` means "no filter" and replaces the display surface's sentinel
/// strings; it never contributes a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum Selection<T> {
    All,
    Specific(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T> Selection<T> {
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: FromStr> Selection<T> {
    /// Parse a raw selector value coming from a query string or CLI flag.
    ///
    /// Absent, blank, `all` and `All Sites` all mean [`Selection::All`].
    pub fn parse_param(raw: Option<&str>) -> Result<Self, T::Err> {
        match raw.map(str::trim) {
            None => Ok(Self::All),
            Some(s) if is_all_sentinel(s) => Ok(Self::All),
            Some(s) => s.parse().map(Self::Specific),
        }
    }
}

fn is_all_sentinel(raw: &str) -> bool {
    raw.is_empty() || raw.eq_ignore_ascii_case("all") || raw.eq_ignore_ascii_case(ALL_SITES_LABEL)
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Specific(value) => value.fmt(f),
        }
    }
}

// =============================================================================
// AIRLINE SELECTION
// =============================================================================

/// Airline dashboard report types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    #[serde(rename = "OPT1", alias = "performance")]
    Performance,
    #[serde(rename = "OPT2", alias = "delay")]
    Delay,
}

impl ReportType {
    pub const ALL: [Self; 2] = [Self::Performance, Self::Delay];

    /// Wire value used by the report type dropdown.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Performance => "OPT1",
            Self::Delay => "OPT2",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Performance => "Yearly Airline Performance Report",
            Self::Delay => "Yearly Airline Delay Report",
        }
    }
}

impl FromStr for ReportType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "opt1" | "performance" => Ok(Self::Performance),
            "opt2" | "delay" => Ok(Self::Delay),
            _ => Err(DomainError::UnknownReportType(s.to_string())),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current airline dashboard controls.
///
/// No report type means nothing has been selected yet and no chart is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AirlineSelection {
    pub report: Option<ReportType>,
    pub year: Selection<i32>,
}

impl AirlineSelection {
    #[must_use]
    pub const fn new(report: Option<ReportType>, year: Selection<i32>) -> Self {
        Self { report, year }
    }

    /// Reject years outside the dropdown's fixed set.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.year {
            Selection::Specific(year) if !AIRLINE_YEARS.contains(&year) => {
                Err(DomainError::YearOutOfRange { year })
            }
            _ => Ok(()),
        }
    }
}

// =============================================================================
// LAUNCH SELECTION
// =============================================================================

/// Closed payload mass interval in kilograms.
///
/// A range with `low > high` contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// Current launch dashboard controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchSelection {
    pub site: Selection<String>,
    pub payload: PayloadRange,
}

impl LaunchSelection {
    #[must_use]
    pub const fn new(site: Selection<String>, payload: PayloadRange) -> Self {
        Self { site, payload }
    }
}

// =============================================================================
// CONTROL PANEL
// =============================================================================

/// One dropdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

impl DropdownOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Categorical selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dropdown {
    pub id: String,
    pub options: Vec<DropdownOption>,
    pub placeholder: Option<String>,
    /// Initially selected value, if any.
    pub value: Option<String>,
    pub searchable: bool,
}

/// Numeric range selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSlider {
    pub id: String,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: PayloadRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    Dropdown(Dropdown),
    RangeSlider(RangeSlider),
}

/// Everything a display surface needs to draw a dashboard's controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPanel {
    pub title: String,
    pub controls: Vec<Control>,
    /// Chart slots in layout order.
    pub slots: Vec<String>,
}

// =============================================================================
// AGGREGATED VIEW
// =============================================================================

/// One value in an aggregated view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Numeric value, if the cell holds a number.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Null | Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Cell {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Grouped or projected slice of a record table, ready for one chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregatedView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl AggregatedView {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Rows with the wrong arity are a programming error.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Non-null numeric values of one column.
    #[must_use]
    pub fn numeric_column(&self, name: &str) -> Vec<f64> {
        self.column(name)
            .map(|cells| cells.filter_map(Cell::as_f64).collect())
            .unwrap_or_default()
    }

    /// Largest numeric value in a column, if any.
    #[must_use]
    pub fn max(&self, name: &str) -> Option<f64> {
        self.numeric_column(name).into_iter().reduce(f64::max)
    }
}

// =============================================================================
// CHART SPECIFICATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Choropleth,
    Treemap,
    Scatter,
}

/// Column bindings for each chart kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Encoding {
    Bar {
        x: String,
        y: String,
        color: Option<String>,
    },
    Line {
        x: String,
        y: String,
        color: Option<String>,
    },
    Pie {
        names: String,
        values: String,
    },
    Choropleth {
        locations: String,
        color: String,
        location_mode: String,
        geo_scope: String,
        color_scale: String,
        range_color: [f64; 2],
        hover_data: Vec<String>,
    },
    Treemap {
        path: Vec<String>,
        values: String,
        color: Option<String>,
        color_scale: Option<String>,
    },
    Scatter {
        x: String,
        y: String,
        color: Option<String>,
    },
}

impl Encoding {
    #[must_use]
    pub const fn kind(&self) -> ChartKind {
        match self {
            Self::Bar { .. } => ChartKind::Bar,
            Self::Line { .. } => ChartKind::Line,
            Self::Pie { .. } => ChartKind::Pie,
            Self::Choropleth { .. } => ChartKind::Choropleth,
            Self::Treemap { .. } => ChartKind::Treemap,
            Self::Scatter { .. } => ChartKind::Scatter,
        }
    }
}

/// Declarative chart for one output slot of a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub slot: String,
    pub title: Option<String>,
    #[serde(flatten)]
    pub encoding: Encoding,
    pub data: AggregatedView,
}

impl ChartSpec {
    #[must_use]
    pub const fn kind(&self) -> ChartKind {
        self.encoding.kind()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Unknown report type: {0}")]
    UnknownReportType(String),

    #[error("Year {year} is outside the offered range 2005-2019")]
    YearOutOfRange { year: i32 },
}
