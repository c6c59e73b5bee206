//! Declared columns of the dashboard datasets.
//!
//! Only declared columns survive ingestion, each cast to its declared type.
//! Everything else in the CSV is ignored.

/// Storage type of a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit integer
    Int,
    /// Double precision float
    Float,
    /// UTF-8 text
    Text,
}

impl ColumnType {
    /// DuckDB type name.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::Int => "BIGINT",
            Self::Float => "DOUBLE",
            Self::Text => "VARCHAR",
        }
    }

    /// Whether values of this type can be summed or averaged.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }
}

/// One declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Header name in the CSV file
    pub name: &'static str,
    /// Declared type
    pub ty: ColumnType,
    /// Missing required columns abort ingestion; optional ones load as NULL.
    pub required: bool,
}

impl ColumnSpec {
    const fn required(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            required: true,
        }
    }

    const fn optional(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            required: false,
        }
    }
}

/// Table layout of one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    /// Human readable dataset name
    pub dataset: &'static str,
    /// Table name inside the engine
    pub table: &'static str,
    /// CSV text encoding understood by DuckDB's `read_csv`
    pub encoding: Option<&'static str>,
    /// Declared columns
    pub columns: &'static [ColumnSpec],
}

impl TableSchema {
    /// Look up a declared column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Airline column names.
pub mod airline {
    #![allow(missing_docs)]
    pub const YEAR: &str = "Year";
    pub const MONTH: &str = "Month";
    pub const AIRLINE: &str = "Reporting_Airline";
    pub const CANCELLATION_CODE: &str = "CancellationCode";
    pub const AIR_TIME: &str = "AirTime";
    pub const DIVERTED_LANDINGS: &str = "DivAirportLandings";
    pub const FLIGHTS: &str = "Flights";
    pub const ORIGIN_STATE: &str = "OriginState";
    pub const DEST_STATE: &str = "DestState";
    pub const CARRIER_DELAY: &str = "CarrierDelay";
    pub const WEATHER_DELAY: &str = "WeatherDelay";
    pub const NAS_DELAY: &str = "NASDelay";
    pub const SECURITY_DELAY: &str = "SecurityDelay";
    pub const LATE_AIRCRAFT_DELAY: &str = "LateAircraftDelay";
}

/// Launch column names.
pub mod launch {
    #![allow(missing_docs)]
    pub const FLIGHT_NUMBER: &str = "Flight Number";
    pub const SITE: &str = "Launch Site";
    pub const CLASS: &str = "class";
    pub const PAYLOAD: &str = "Payload Mass (kg)";
    pub const BOOSTER_VERSION: &str = "Booster Version";
    pub const BOOSTER_CATEGORY: &str = "Booster Version Category";
}

use ColumnType::{Float, Int, Text};

/// US domestic airline flight records (ISO-8859-1 encoded).
pub static AIRLINE_SCHEMA: TableSchema = TableSchema {
    dataset: "airline",
    table: "flights",
    encoding: Some("latin-1"),
    columns: &[
        ColumnSpec::required(airline::YEAR, Int),
        ColumnSpec::required(airline::MONTH, Int),
        ColumnSpec::required(airline::AIRLINE, Text),
        ColumnSpec::required(airline::CANCELLATION_CODE, Text),
        ColumnSpec::required(airline::AIR_TIME, Float),
        ColumnSpec::required(airline::DIVERTED_LANDINGS, Float),
        ColumnSpec::required(airline::FLIGHTS, Float),
        ColumnSpec::required(airline::ORIGIN_STATE, Text),
        ColumnSpec::required(airline::DEST_STATE, Text),
        ColumnSpec::required(airline::CARRIER_DELAY, Float),
        ColumnSpec::required(airline::WEATHER_DELAY, Float),
        ColumnSpec::required(airline::NAS_DELAY, Float),
        ColumnSpec::required(airline::SECURITY_DELAY, Float),
        ColumnSpec::required(airline::LATE_AIRCRAFT_DELAY, Float),
        ColumnSpec::optional("Div1Airport", Text),
        ColumnSpec::optional("Div2Airport", Text),
        ColumnSpec::optional("Div1TailNum", Text),
        ColumnSpec::optional("Div2TailNum", Text),
    ],
};

/// SpaceX launch records.
pub static LAUNCH_SCHEMA: TableSchema = TableSchema {
    dataset: "launch",
    table: "launches",
    encoding: None,
    columns: &[
        ColumnSpec::optional(launch::FLIGHT_NUMBER, Int),
        ColumnSpec::required(launch::SITE, Text),
        ColumnSpec::required(launch::CLASS, Int),
        ColumnSpec::required(launch::PAYLOAD, Float),
        ColumnSpec::optional(launch::BOOSTER_VERSION, Text),
        ColumnSpec::required(launch::BOOSTER_CATEGORY, Text),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_lookup() {
        let col = AIRLINE_SCHEMA.column("Flights").unwrap();
        assert_eq!(col.ty, ColumnType::Float);
        assert!(col.required);
        assert!(AIRLINE_SCHEMA.column("Div1Airport").is_some_and(|c| !c.required));
        assert!(LAUNCH_SCHEMA.column("Flights").is_none());
    }
}
