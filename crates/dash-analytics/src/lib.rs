//! # Dashboard Analytics
//!
//! Record tables and the query/aggregate step behind the airline and launch
//! dashboards. A CSV file is ingested once into an in-memory DuckDB database;
//! every selection change then runs a fresh set of filtered `GROUP BY`
//! queries and maps each result to a declarative chart.
//!
//! ## Modules
//!
//! - [`schema`]: declared columns of each dataset
//! - [`engine`]: CSV ingestion and query execution
//! - [`queries`]: filter predicates and grouped aggregations
//! - [`charts`]: aggregated view to chart specification
//! - [`dashboards`]: the airline and launch dashboards
//! - [`reports`]: JSON / Markdown export of a dashboard's charts

#![forbid(unsafe_code)]
#![warn(clippy::all, missing_docs)]

pub mod charts;
pub mod dashboards;
pub mod engine;
pub mod error;
pub mod queries;
pub mod reports;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

pub use dashboards::airline::AirlineDashboard;
pub use dashboards::launches::LaunchDashboard;
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use queries::{Aggregation, Filter, Predicate, Reducer};
pub use reports::DashboardReport;
