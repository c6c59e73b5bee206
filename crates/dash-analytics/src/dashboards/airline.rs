//! US domestic airline flight performance dashboard.
//!
//! The performance report fills five slots with a treemap, a pie, a state
//! choropleth, a bar and a line chart; the delay report fills the same slots
//! with one average-delay line chart per delay cause.

use std::path::Path;

use dash_domain::{
    AirlineSelection, ChartSpec, Control, ControlPanel, Dropdown, DropdownOption, ReportType,
    AIRLINE_YEARS,
};
use tracing::debug;

use crate::charts;
use crate::dashboards::Dashboard;
use crate::engine::AnalyticsEngine;
use crate::error::Result;
use crate::queries::{Aggregation, Filter};
use crate::schema::airline::{
    AIRLINE, AIR_TIME, CANCELLATION_CODE, CARRIER_DELAY, DEST_STATE, DIVERTED_LANDINGS, FLIGHTS,
    LATE_AIRCRAFT_DELAY, MONTH, NAS_DELAY, ORIGIN_STATE, SECURITY_DELAY, WEATHER_DELAY, YEAR,
};
use crate::schema::AIRLINE_SCHEMA;

/// Output slots in layout order.
pub const SLOTS: [&str; 5] = ["plot1", "plot2", "plot3", "plot4", "plot5"];

const DELAY_METRICS: [(&str, &str); 5] = [
    (CARRIER_DELAY, "Average carrier delay time (minutes) by airline"),
    (WEATHER_DELAY, "Average weather delay time (minutes) by airline"),
    (NAS_DELAY, "Average NAS delay time (minutes) by airline"),
    (SECURITY_DELAY, "Average security delay time (minutes) by airline"),
    (LATE_AIRCRAFT_DELAY, "Average late aircraft delay time (minutes) by airline"),
];

/// Airline flight records and their report definitions.
pub struct AirlineDashboard {
    engine: AnalyticsEngine,
}

impl AirlineDashboard {
    /// Load the airline CSV.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(AnalyticsEngine::load_csv(&AIRLINE_SCHEMA, path)?))
    }

    /// Wrap an engine that already holds the airline table.
    #[must_use]
    pub const fn new(engine: AnalyticsEngine) -> Self {
        Self { engine }
    }

    /// Underlying record table.
    #[must_use]
    pub const fn engine(&self) -> &AnalyticsEngine {
        &self.engine
    }
}

impl Dashboard for AirlineDashboard {
    type Selection = AirlineSelection;

    const NAME: &'static str = "airline";

    fn controls(&self) -> ControlPanel {
        let report_types = Dropdown {
            id: "input-type".to_string(),
            options: ReportType::ALL
                .iter()
                .map(|r| DropdownOption::new(r.label(), r.as_str()))
                .collect(),
            placeholder: Some("Select a report type".to_string()),
            value: None,
            searchable: false,
        };
        let years = Dropdown {
            id: "input-year".to_string(),
            options: AIRLINE_YEARS
                .map(|y| DropdownOption::new(y.to_string(), y.to_string()))
                .collect(),
            placeholder: Some("Select a year".to_string()),
            value: None,
            searchable: false,
        };

        ControlPanel {
            title: "US Domestic Airline Flights Performance".to_string(),
            controls: vec![Control::Dropdown(report_types), Control::Dropdown(years)],
            slots: SLOTS.iter().map(ToString::to_string).collect(),
        }
    }

    fn compute_view(&self, selection: &AirlineSelection) -> Result<Vec<ChartSpec>> {
        compute_view(&self.engine, selection)
    }
}

/// Charts for an airline selection.
///
/// Without a report type nothing is drawn. A year outside the offered set is
/// rejected.
pub fn compute_view(engine: &AnalyticsEngine, selection: &AirlineSelection) -> Result<Vec<ChartSpec>> {
    selection.validate()?;
    let Some(report) = selection.report else {
        debug!("No report type selected");
        return Ok(Vec::new());
    };

    debug!(report = %report, year = %selection.year, "Computing airline view");
    let filter = Filter::new().selected(YEAR, &selection.year);
    match report {
        ReportType::Performance => performance_report(engine, &filter),
        ReportType::Delay => delay_report(engine, &filter),
    }
}

fn performance_report(engine: &AnalyticsEngine, filter: &Filter) -> Result<Vec<ChartSpec>> {
    let cancellations =
        engine.aggregate(filter, &Aggregation::sum(FLIGHTS).by([MONTH, CANCELLATION_CODE]))?;
    let air_time = engine.aggregate(filter, &Aggregation::mean(AIR_TIME).by([MONTH, AIRLINE]))?;
    // NULL landings count as diverted, matching `!= 0` on a NaN column.
    let diverted = engine.aggregate(
        &filter.clone().distinct_from(DIVERTED_LANDINGS, 0.0),
        &Aggregation::sum(FLIGHTS).by([AIRLINE]),
    )?;
    let origins = engine.aggregate(filter, &Aggregation::sum(FLIGHTS).by([ORIGIN_STATE]))?;
    let destinations =
        engine.aggregate(filter, &Aggregation::sum(FLIGHTS).by([DEST_STATE, AIRLINE]))?;

    Ok(vec![
        charts::treemap(
            SLOTS[0],
            "Number of flights flying to each state from each reporting airline",
            destinations,
            &[AIRLINE, DEST_STATE],
            FLIGHTS,
            "RdBu",
        ),
        charts::pie(
            SLOTS[1],
            Some("% of flights by reporting airline"),
            diverted,
            AIRLINE,
            FLIGHTS,
        ),
        charts::us_state_choropleth(
            SLOTS[2],
            "Number of flights from origin state",
            origins,
            ORIGIN_STATE,
            FLIGHTS,
            "GnBu",
        ),
        charts::bar(
            SLOTS[3],
            "Monthly Flight Cancellation",
            cancellations,
            MONTH,
            FLIGHTS,
            CANCELLATION_CODE,
        ),
        charts::line(SLOTS[4], "Average flight time", air_time, MONTH, AIR_TIME, AIRLINE),
    ])
}

fn delay_report(engine: &AnalyticsEngine, filter: &Filter) -> Result<Vec<ChartSpec>> {
    SLOTS
        .iter()
        .zip(DELAY_METRICS)
        .map(|(slot, (column, title))| {
            let view = engine.aggregate(filter, &Aggregation::mean(column).by([MONTH, AIRLINE]))?;
            Ok(charts::line(slot, title, view, MONTH, column, AIRLINE))
        })
        .collect()
}
