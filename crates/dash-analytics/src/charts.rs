//! Chart renderer: one aggregated view in, one chart specification out.
//!
//! Bindings are not checked against the view's columns; a bad binding is the
//! display surface's problem. Empty views produce charts with no data.

use dash_domain::{AggregatedView, ChartSpec, Encoding};

fn spec(slot: &str, title: Option<&str>, encoding: Encoding, data: AggregatedView) -> ChartSpec {
    ChartSpec {
        slot: slot.to_string(),
        title: title.map(str::to_string),
        encoding,
        data,
    }
}

/// Bar chart of `y` against `x`, one colour per `color` value.
#[must_use]
pub fn bar(slot: &str, title: &str, data: AggregatedView, x: &str, y: &str, color: &str) -> ChartSpec {
    let encoding = Encoding::Bar {
        x: x.to_string(),
        y: y.to_string(),
        color: Some(color.to_string()),
    };
    spec(slot, Some(title), encoding, data)
}

/// Line chart of `y` against `x`, one line per `color` value.
#[must_use]
pub fn line(slot: &str, title: &str, data: AggregatedView, x: &str, y: &str, color: &str) -> ChartSpec {
    let encoding = Encoding::Line {
        x: x.to_string(),
        y: y.to_string(),
        color: Some(color.to_string()),
    };
    spec(slot, Some(title), encoding, data)
}

/// Pie chart with one slice per `names` value sized by `values`.
#[must_use]
pub fn pie(slot: &str, title: Option<&str>, data: AggregatedView, names: &str, values: &str) -> ChartSpec {
    let encoding = Encoding::Pie {
        names: names.to_string(),
        values: values.to_string(),
    };
    spec(slot, title, encoding, data)
}

/// US state choropleth coloured by `color`, scaled from zero to the view's maximum.
#[must_use]
pub fn us_state_choropleth(
    slot: &str,
    title: &str,
    data: AggregatedView,
    locations: &str,
    color: &str,
    color_scale: &str,
) -> ChartSpec {
    let upper = data.max(color).unwrap_or(0.0);
    let encoding = Encoding::Choropleth {
        locations: locations.to_string(),
        color: color.to_string(),
        location_mode: "USA-states".to_string(),
        geo_scope: "usa".to_string(),
        color_scale: color_scale.to_string(),
        range_color: [0.0, upper],
        hover_data: vec![locations.to_string(), color.to_string()],
    };
    spec(slot, Some(title), encoding, data)
}

/// Treemap nested along `path`, sized and coloured by `values`.
#[must_use]
pub fn treemap(
    slot: &str,
    title: &str,
    data: AggregatedView,
    path: &[&str],
    values: &str,
    color_scale: &str,
) -> ChartSpec {
    let encoding = Encoding::Treemap {
        path: path.iter().map(|p| (*p).to_string()).collect(),
        values: values.to_string(),
        color: Some(values.to_string()),
        color_scale: Some(color_scale.to_string()),
    };
    spec(slot, Some(title), encoding, data)
}

/// Scatter of `y` against `x`, one colour per `color` value.
#[must_use]
pub fn scatter(slot: &str, title: Option<&str>, data: AggregatedView, x: &str, y: &str, color: &str) -> ChartSpec {
    let encoding = Encoding::Scatter {
        x: x.to_string(),
        y: y.to_string(),
        color: Some(color.to_string()),
    };
    spec(slot, title, encoding, data)
}
