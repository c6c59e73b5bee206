//! Report generation for dashboard charts.

use std::fmt::Write as _;

use dash_domain::{AggregatedView, ChartSpec};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One dashboard evaluation, ready to export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// RFC 3339 timestamp
    pub generated_at: String,
    /// Dashboard name
    pub dashboard: String,
    /// Selection the charts were computed for
    pub selection: serde_json::Value,
    /// Charts in slot order
    pub charts: Vec<ChartSpec>,
}

impl DashboardReport {
    /// Bundle charts with the selection that produced them.
    pub fn new<S: Serialize>(dashboard: &str, selection: &S, charts: Vec<ChartSpec>) -> Result<Self> {
        Ok(Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            dashboard: dashboard.to_string(),
            selection: serde_json::to_value(selection)?,
            charts,
        })
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Markdown document with one table per chart.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "# {} dashboard report\n", self.dashboard);
        let _ = writeln!(md, "**Generated:** {}\n", self.generated_at);
        let _ = writeln!(md, "**Selection:** `{}`\n", self.selection);

        if self.charts.is_empty() {
            md.push_str("_Nothing selected._\n");
            return md;
        }

        for chart in &self.charts {
            let title = chart.title.as_deref().unwrap_or(&chart.slot);
            let _ = writeln!(md, "## {title}\n");
            let _ = writeln!(md, "*{:?} chart in slot `{}`*\n", chart.kind(), chart.slot);
            if chart.is_empty() {
                md.push_str("_No data for this selection._\n\n");
            } else {
                write_table(&mut md, &chart.data);
                md.push('\n');
            }
        }

        md
    }
}

fn write_table(md: &mut String, view: &AggregatedView) {
    let _ = writeln!(md, "| {} |", view.columns.join(" | "));
    let _ = writeln!(
        md,
        "|{}|",
        view.columns.iter().map(|_| "---").collect::<Vec<_>>().join("|")
    );
    for row in &view.rows {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        let _ = writeln!(md, "| {} |", cells.join(" | "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::Dashboard;
    use crate::testing;
    use crate::LaunchDashboard;
    use dash_domain::{LaunchSelection, PayloadRange, Selection};

    #[test]
    fn test_markdown_report() {
        let dash = LaunchDashboard::new(testing::launch_engine()).unwrap();
        let report = dash.report(&dash.default_selection()).unwrap();
        assert_eq!(report.dashboard, "launches");
        assert_eq!(report.charts.len(), 2);

        let md = report.to_markdown();
        assert!(md.starts_with("# launches dashboard report"));
        assert!(md.contains("## Total successful launches by site"));
        assert!(md.contains("| Launch Site | class |"));
        assert!(md.contains("| CCAFS LC-40 | 2 |"));
    }

    #[test]
    fn test_empty_chart_is_called_out() {
        let dash = LaunchDashboard::new(testing::launch_engine()).unwrap();
        let selection = LaunchSelection::new(Selection::All, PayloadRange::new(50_000.0, 60_000.0));
        let md = dash.report(&selection).unwrap().to_markdown();
        assert!(md.contains("_No data for this selection._"));
    }

    #[test]
    fn test_json_report_round_trips() {
        let dash = LaunchDashboard::new(testing::launch_engine()).unwrap();
        let report = dash.report(&dash.default_selection()).unwrap();
        let back: DashboardReport = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(back.charts, report.charts);
        assert_eq!(back.selection["site"]["mode"], "all");
    }
}
