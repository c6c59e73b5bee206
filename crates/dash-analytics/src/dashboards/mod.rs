//! The two dashboards and the seam they share with the HTTP layer.

pub mod airline;
pub mod launches;

use dash_domain::{ChartSpec, ControlPanel};
use serde::Serialize;

use crate::error::Result;
use crate::reports::DashboardReport;

/// A record table plus the selection-to-charts mapping built on it.
pub trait Dashboard {
    /// Selection state driving [`Dashboard::compute_view`].
    type Selection: Serialize;

    /// Short name used in routes and reports.
    const NAME: &'static str;

    /// Controls the display surface should offer.
    fn controls(&self) -> ControlPanel;

    /// Charts for the given selection, in slot order.
    fn compute_view(&self, selection: &Self::Selection) -> Result<Vec<ChartSpec>>;

    /// Charts for the given selection bundled with a timestamp.
    fn report(&self, selection: &Self::Selection) -> Result<DashboardReport> {
        let charts = self.compute_view(selection)?;
        DashboardReport::new(Self::NAME, selection, charts)
    }
}
