//! # Dashboard Routes
//!
//! Control panels and chart endpoints for both dashboards. Query strings
//! carry the current control values; an empty, missing or "All Sites" value
//! selects everything.

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use dash_analytics::dashboards::Dashboard;
use dash_domain::{
    AirlineSelection, ChartSpec, ControlPanel, LaunchSelection, PayloadRange, ReportType, Selection,
};
use serde::{Deserialize, Serialize};

use crate::context::{with_dashboard, AppContext};
use crate::error::{ApiError, ApiResult};

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Charts computed for one selection.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartsResponse<S> {
    pub dashboard: String,
    pub selection: S,
    pub charts: Vec<ChartSpec>,
}

/// Airline chart request parameters
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AirlineChartQuery {
    pub report: Option<String>,
    pub year: Option<String>,
}

impl AirlineChartQuery {
    /// Parse into a validated selection.
    pub fn into_selection(self) -> ApiResult<AirlineSelection> {
        let report = match self.report.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<ReportType>()
                    .map_err(|e| ApiError::InvalidInput(e.to_string()))?,
            ),
        };
        let year = Selection::<i32>::parse_param(self.year.as_deref())
            .map_err(|e| ApiError::InvalidInput(format!("year: {e}")))?;

        let selection = AirlineSelection::new(report, year);
        selection
            .validate()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        Ok(selection)
    }
}

/// Launch chart request parameters
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LaunchChartQuery {
    pub site: Option<String>,
    pub payload_low: Option<String>,
    pub payload_high: Option<String>,
}

impl LaunchChartQuery {
    /// Parse into a selection, taking missing or blank payload bounds from `bounds`.
    pub fn into_selection(self, bounds: PayloadRange) -> ApiResult<LaunchSelection> {
        let site = match Selection::<String>::parse_param(self.site.as_deref()) {
            Ok(site) => site,
            Err(never) => match never {},
        };
        let payload = PayloadRange::new(
            parse_bound("payload_low", self.payload_low.as_deref())?.unwrap_or(bounds.low),
            parse_bound("payload_high", self.payload_high.as_deref())?.unwrap_or(bounds.high),
        );
        Ok(LaunchSelection::new(site, payload))
    }
}

fn parse_bound(name: &str, raw: Option<&str>) -> ApiResult<Option<f64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| ApiError::InvalidInput(format!("{name}: '{value}' is not a number"))),
    }
}

/// Landing page rendering both dashboards in the browser
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    "OK"
}

/// `GET /api/airline/controls`
pub async fn airline_controls(State(ctx): State<AppContext>) -> ApiResult<Json<ControlPanel>> {
    let panel = with_dashboard(ctx.airline()?, |dash| Ok(dash.controls())).await?;
    Ok(Json(panel))
}

/// `GET /api/airline/charts`
pub async fn airline_charts(
    State(ctx): State<AppContext>,
    Query(query): Query<AirlineChartQuery>,
) -> ApiResult<Json<ChartsResponse<AirlineSelection>>> {
    let selection = query.into_selection()?;
    let dashboard = ctx.airline()?;

    let response = with_dashboard(dashboard, move |dash| {
        let charts = dash.compute_view(&selection)?;
        tracing::debug!(charts = charts.len(), "Airline charts computed");
        Ok(ChartsResponse {
            dashboard: dash_analytics::AirlineDashboard::NAME.to_string(),
            selection,
            charts,
        })
    })
    .await?;

    Ok(Json(response))
}

/// `GET /api/launches/controls`
pub async fn launch_controls(State(ctx): State<AppContext>) -> ApiResult<Json<ControlPanel>> {
    let panel = with_dashboard(ctx.launches()?, |dash| Ok(dash.controls())).await?;
    Ok(Json(panel))
}

/// `GET /api/launches/charts`
pub async fn launch_charts(
    State(ctx): State<AppContext>,
    Query(query): Query<LaunchChartQuery>,
) -> ApiResult<Json<ChartsResponse<LaunchSelection>>> {
    let dashboard = ctx.launches()?;

    let response = with_dashboard(dashboard, move |dash| {
        let selection = query.into_selection(dash.payload_bounds())?;
        let charts = dash.compute_view(&selection)?;
        tracing::debug!(charts = charts.len(), "Launch charts computed");
        Ok(ChartsResponse {
            dashboard: dash_analytics::LaunchDashboard::NAME.to_string(),
            selection,
            charts,
        })
    })
    .await?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airline_query_parsing() {
        let sel = AirlineChartQuery {
            report: Some("OPT1".into()),
            year: Some("2010".into()),
        }
        .into_selection()
        .unwrap();
        assert_eq!(sel.report, Some(ReportType::Performance));
        assert_eq!(sel.year, Selection::Specific(2010));

        let sel = AirlineChartQuery::default().into_selection().unwrap();
        assert!(sel.report.is_none());
        assert!(sel.year.is_all());
    }

    #[test]
    fn test_airline_query_rejects_bad_values() {
        let bad = [
            AirlineChartQuery { report: Some("OPT9".into()), year: None },
            AirlineChartQuery { report: Some("OPT2".into()), year: Some("twenty".into()) },
            AirlineChartQuery { report: Some("OPT2".into()), year: Some("1999".into()) },
        ];
        for query in bad {
            assert!(matches!(query.into_selection(), Err(ApiError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_launch_query_defaults_to_bounds() {
        let bounds = PayloadRange::new(0.0, 9600.0);
        let sel = LaunchChartQuery {
            site: Some("All Sites".into()),
            payload_low: Some(" ".into()),
            payload_high: Some("5000".into()),
        }
        .into_selection(bounds)
        .unwrap();
        assert!(sel.site.is_all());
        assert_eq!(sel.payload, PayloadRange::new(0.0, 5000.0));

        let sel = LaunchChartQuery {
            site: Some("KSC LC-39A".into()),
            ..LaunchChartQuery::default()
        }
        .into_selection(bounds)
        .unwrap();
        assert_eq!(sel.site, Selection::Specific("KSC LC-39A".to_string()));
        assert_eq!(sel.payload, bounds);
    }

    #[test]
    fn test_launch_query_rejects_bad_bounds() {
        let bounds = PayloadRange::new(0.0, 9600.0);
        for raw in ["abc", "NaN", "inf"] {
            let query = LaunchChartQuery {
                payload_high: Some(raw.into()),
                ..LaunchChartQuery::default()
            };
            assert!(matches!(query.into_selection(bounds), Err(ApiError::InvalidInput(_))));
        }
    }
}
