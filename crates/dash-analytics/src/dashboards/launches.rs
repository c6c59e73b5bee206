//! SpaceX launch records dashboard.

use std::path::Path;

use dash_domain::{
    ChartSpec, Control, ControlPanel, Dropdown, DropdownOption, LaunchSelection, PayloadRange,
    RangeSlider, Selection, ALL_SITES_LABEL,
};
use tracing::debug;

use crate::charts;
use crate::dashboards::Dashboard;
use crate::engine::AnalyticsEngine;
use crate::error::Result;
use crate::queries::{Aggregation, Filter, COUNT_COLUMN};
use crate::schema::launch::{BOOSTER_CATEGORY, CLASS, PAYLOAD, SITE};
use crate::schema::LAUNCH_SCHEMA;

/// Slot of the launch outcome pie.
pub const PIE_SLOT: &str = "success-pie-chart";
/// Slot of the payload/outcome scatter.
pub const SCATTER_SLOT: &str = "success-payload-scatter-chart";
/// Upper end of the payload slider.
pub const PAYLOAD_SLIDER_MAX: f64 = 10_000.0;
/// Payload slider step.
pub const PAYLOAD_SLIDER_STEP: f64 = 1_000.0;

/// Launch records plus the site list and payload bounds read at load time.
pub struct LaunchDashboard {
    engine: AnalyticsEngine,
    sites: Vec<String>,
    payload_bounds: PayloadRange,
}

impl LaunchDashboard {
    /// Load the launch CSV.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(AnalyticsEngine::load_csv(&LAUNCH_SCHEMA, path)?)
    }

    /// Wrap an engine that already holds the launch table.
    pub fn new(engine: AnalyticsEngine) -> Result<Self> {
        let sites = engine
            .distinct_values(SITE)?
            .iter()
            .map(ToString::to_string)
            .collect();
        let payload_bounds = engine
            .bounds(PAYLOAD)?
            .map_or(PayloadRange::new(0.0, PAYLOAD_SLIDER_MAX), |(low, high)| {
                PayloadRange::new(low, high)
            });

        Ok(Self {
            engine,
            sites,
            payload_bounds,
        })
    }

    /// Launch sites in order of first appearance.
    #[must_use]
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    /// Smallest and largest payload in the data.
    #[must_use]
    pub const fn payload_bounds(&self) -> PayloadRange {
        self.payload_bounds
    }

    /// Initial control values: every site, full payload range.
    #[must_use]
    pub const fn default_selection(&self) -> LaunchSelection {
        LaunchSelection::new(Selection::All, self.payload_bounds)
    }

    /// Underlying record table.
    #[must_use]
    pub const fn engine(&self) -> &AnalyticsEngine {
        &self.engine
    }
}

impl Dashboard for LaunchDashboard {
    type Selection = LaunchSelection;

    const NAME: &'static str = "launches";

    fn controls(&self) -> ControlPanel {
        let options = std::iter::once(ALL_SITES_LABEL)
            .chain(self.sites.iter().map(String::as_str))
            .map(|site| DropdownOption::new(site, site))
            .collect();

        let sites = Dropdown {
            id: "site-dropdown".to_string(),
            options,
            placeholder: Some("Select a Launch Site here".to_string()),
            value: Some(ALL_SITES_LABEL.to_string()),
            searchable: true,
        };
        let payload = RangeSlider {
            id: "payload-slider".to_string(),
            label: "Payload range (Kg):".to_string(),
            min: self.payload_bounds.low,
            max: PAYLOAD_SLIDER_MAX,
            step: PAYLOAD_SLIDER_STEP,
            value: self.payload_bounds,
        };

        ControlPanel {
            title: "SpaceX Launch Records Dashboard".to_string(),
            controls: vec![Control::Dropdown(sites), Control::RangeSlider(payload)],
            slots: vec![PIE_SLOT.to_string(), SCATTER_SLOT.to_string()],
        }
    }

    fn compute_view(&self, selection: &LaunchSelection) -> Result<Vec<ChartSpec>> {
        compute_view(&self.engine, selection)
    }
}

/// Outcome pie followed by the payload scatter.
pub fn compute_view(engine: &AnalyticsEngine, selection: &LaunchSelection) -> Result<Vec<ChartSpec>> {
    debug!(
        site = %selection.site,
        low = selection.payload.low,
        high = selection.payload.high,
        "Computing launch view"
    );
    Ok(vec![
        success_pie(engine, &selection.site)?,
        payload_scatter(engine, selection)?,
    ])
}

/// Successes per site for `All`, success/failure split for one site.
pub fn success_pie(engine: &AnalyticsEngine, site: &Selection<String>) -> Result<ChartSpec> {
    match site {
        Selection::All => {
            let view = engine.aggregate(&Filter::new(), &Aggregation::sum(CLASS).by([SITE]))?;
            Ok(charts::pie(
                PIE_SLOT,
                Some("Total successful launches by site"),
                view,
                SITE,
                CLASS,
            ))
        }
        Selection::Specific(name) => {
            let view = engine.aggregate(
                &Filter::new().equals(SITE, name.as_str()),
                &Aggregation::count().by([CLASS]),
            )?;
            Ok(charts::pie(
                PIE_SLOT,
                Some(format!("Total launch outcomes for site {name}").as_str()),
                view,
                CLASS,
                COUNT_COLUMN,
            ))
        }
    }
}

/// Launches inside the payload range, restricted to the selected site.
pub fn payload_scatter(engine: &AnalyticsEngine, selection: &LaunchSelection) -> Result<ChartSpec> {
    let filter = Filter::new()
        .between(PAYLOAD, selection.payload.low, selection.payload.high)
        .selected(SITE, &selection.site);
    let view = engine.select(&[PAYLOAD, CLASS, BOOSTER_CATEGORY], &filter)?;
    Ok(charts::scatter(
        SCATTER_SLOT,
        Some("Correlation between payload and launch outcome"),
        view,
        PAYLOAD,
        CLASS,
        BOOSTER_CATEGORY,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use dash_domain::{Cell, ChartKind};
    use std::collections::HashSet;

    fn dashboard() -> LaunchDashboard {
        LaunchDashboard::new(testing::launch_engine()).unwrap()
    }

    fn selection(site: Option<&str>, low: f64, high: f64) -> LaunchSelection {
        let site = site.map_or(Selection::All, |s| Selection::Specific(s.to_string()));
        LaunchSelection::new(site, PayloadRange::new(low, high))
    }

    #[test]
    fn test_load_reads_sites_and_bounds() {
        let dash = dashboard();
        assert_eq!(dash.sites(), ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A"]);
        assert_eq!(dash.payload_bounds(), PayloadRange::new(500.0, 9000.0));
        assert!(dash.default_selection().site.is_all());
    }

    #[test]
    fn test_all_sites_pie_counts_each_site_once() {
        let dash = dashboard();
        let charts = dash.compute_view(&dash.default_selection()).unwrap();
        let pie = &charts[0];
        assert_eq!(pie.kind(), ChartKind::Pie);
        assert_eq!(
            pie.data.rows,
            vec![
                vec![Cell::from("CCAFS LC-40"), Cell::Int(2)],
                vec![Cell::from("KSC LC-39A"), Cell::Int(1)],
                vec![Cell::from("VAFB SLC-4E"), Cell::Int(1)],
            ]
        );

        let covered: HashSet<String> = pie.data.column(SITE).unwrap().map(ToString::to_string).collect();
        let expected: HashSet<String> = dash.sites().iter().cloned().collect();
        assert_eq!(covered, expected);
        assert_eq!(covered.len(), pie.data.len());
    }

    #[test]
    fn test_single_site_pie_splits_outcomes() {
        let dash = dashboard();
        let charts = dash
            .compute_view(&selection(Some("CCAFS LC-40"), 0.0, 10_000.0))
            .unwrap();
        assert_eq!(
            charts[0].data.rows,
            vec![vec![Cell::Int(0), Cell::Int(1)], vec![Cell::Int(1), Cell::Int(2)]]
        );
    }

    #[test]
    fn test_scatter_applies_site_and_range() {
        let dash = dashboard();
        let charts = dash
            .compute_view(&selection(Some("CCAFS LC-40"), 0.0, 2800.0))
            .unwrap();
        let scatter = &charts[1];
        assert_eq!(scatter.kind(), ChartKind::Scatter);
        assert_eq!(scatter.data.numeric_column(PAYLOAD), vec![500.0, 2500.0]);
        assert!(scatter
            .data
            .column(BOOSTER_CATEGORY)
            .unwrap()
            .all(|c| !c.is_null()));
    }

    #[test]
    fn test_scatter_range_applies_to_all_sites() {
        let dash = dashboard();
        let charts = dash.compute_view(&selection(None, 1000.0, 7000.0)).unwrap();
        assert_eq!(
            charts[1].data.numeric_column(PAYLOAD),
            vec![2500.0, 6000.0, 3000.0, 4000.0]
        );
    }

    #[test]
    fn test_range_outside_data_is_empty_not_an_error() {
        let dash = dashboard();
        let charts = dash.compute_view(&selection(None, 20_000.0, 30_000.0)).unwrap();
        assert!(charts[1].is_empty());
        assert!(!charts[0].is_empty());

        let charts = dash.compute_view(&selection(None, 7000.0, 1000.0)).unwrap();
        assert!(charts[1].is_empty());
    }

    #[test]
    fn test_unknown_site_is_empty() {
        let charts = dashboard()
            .compute_view(&selection(Some("Boca Chica"), 0.0, 10_000.0))
            .unwrap();
        assert!(charts.iter().all(ChartSpec::is_empty));
    }

    #[test]
    fn test_deterministic() {
        let dash = dashboard();
        let sel = selection(Some("KSC LC-39A"), 0.0, 9000.0);
        assert_eq!(dash.compute_view(&sel).unwrap(), dash.compute_view(&sel).unwrap());
    }

    #[test]
    fn test_controls() {
        let dash = dashboard();
        let panel = dash.controls();
        let Control::Dropdown(sites) = &panel.controls[0] else {
            panic!("expected the site dropdown");
        };
        assert_eq!(sites.options[0].value, ALL_SITES_LABEL);
        assert_eq!(sites.options.len(), 4);

        let Control::RangeSlider(slider) = &panel.controls[1] else {
            panic!("expected the payload slider");
        };
        assert_eq!(slider.min, 500.0);
        assert_eq!(slider.max, PAYLOAD_SLIDER_MAX);
        assert_eq!(slider.value, PayloadRange::new(500.0, 9000.0));
    }
}
