//! # Flight & Launch Dashboards Service
//!
//! HTTP service exposing the airline performance and SpaceX launch records
//! dashboards.
//!
//! ## Features
//!
//! - **Control Panels**: dropdown and slider definitions for each dashboard
//! - **Charts**: chart specifications recomputed for every control change
//! - **Landing Page**: browser front end drawing the charts with Plotly
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Axum HTTP Server                         │
//! │            (JSON API + Landing Page + Health)               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    AppContext                               │
//! │          (Arc<Mutex<Dashboard>> per loaded dataset)         │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │   AirlineDashboard      │   │      LaunchDashboard         │
//! │  (DuckDB flight table)  │   │   (DuckDB launch table)      │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod context;
pub mod error;
pub mod routes;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use context::AppContext;
pub use error::{ApiError, ApiResult};

/// Build the CORS layer; `*` allows any origin.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(%origin, %err, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_origin(allow_origin)
        .allow_headers(Any)
}

/// Build the Axum router
pub fn build_router(ctx: AppContext, cors_origins: &[String]) -> Router {
    Router::new()
        // Airline dashboard
        .route("/api/airline/controls", get(routes::airline_controls))
        .route("/api/airline/charts", get(routes::airline_charts))
        // Launch dashboard
        .route("/api/launches/controls", get(routes::launch_controls))
        .route("/api/launches/charts", get(routes::launch_charts))
        // Health check
        .route("/health", get(routes::health_check))
        .route("/", get(routes::index))
        // State and middleware
        .with_state(ctx)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use crate::context::AppContextBuilder;
    use dash_analytics::{AirlineDashboard, LaunchDashboard};
    use tempfile::NamedTempFile;
    use tower::ServiceExt;

    const AIRLINE_CSV: &str = "\
Year,Month,Reporting_Airline,CancellationCode,AirTime,DivAirportLandings,Flights,OriginState,DestState,CarrierDelay,WeatherDelay,NASDelay,SecurityDelay,LateAircraftDelay
2010,1,AA,,120,0,1,CA,NY,10,0,5,0,20
2010,1,DL,B,,1,1,GA,CA,,,,,
2010,2,UA,,200,0,1,IL,CA,15,0,10,2,0
2011,3,AA,,110,0,1,NY,CA,0,0,0,0,0
";

    const LAUNCH_CSV: &str = "\
Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
1,CCAFS LC-40,0,0,F9 v1.0  B0003,v1.0
2,CCAFS LC-40,1,525,F9 v1.1,v1.1
3,VAFB SLC-4E,1,9600,F9 FT B1029.1,FT
4,KSC LC-39A,1,2490,F9 FT B1031.1,FT
";

    fn csv(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn app() -> Router {
        let airline = csv(AIRLINE_CSV);
        let launches = csv(LAUNCH_CSV);
        let ctx = AppContextBuilder::new()
            .with_airline(AirlineDashboard::load(airline.path()).unwrap())
            .with_launches(LaunchDashboard::load(launches.path()).unwrap())
            .build()
            .unwrap();
        build_router(ctx, &["*".to_string()])
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("<html"));
    }

    #[tokio::test]
    async fn test_airline_controls() {
        let (status, body) = get_json(app(), "/api/airline/controls").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "US Domestic Airline Flights Performance");
        assert_eq!(body["slots"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_airline_performance_charts() {
        let (status, body) = get_json(app(), "/api/airline/charts?report=OPT1&year=2010").await;
        assert_eq!(status, StatusCode::OK);
        let charts = body["charts"].as_array().unwrap();
        assert_eq!(charts.len(), 5);
        assert_eq!(charts[0]["slot"], "plot1");
        assert_eq!(charts[0]["kind"], "treemap");
        assert_eq!(body["selection"]["year"]["value"], 2010);
    }

    #[tokio::test]
    async fn test_airline_without_report_is_empty() {
        let (status, body) = get_json(app(), "/api/airline/charts?year=2010").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["charts"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_airline_bad_year_is_rejected() {
        let (status, body) = get_json(app(), "/api/airline/charts?report=OPT2&year=1990").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_launch_charts_default_to_full_range() {
        let (status, body) = get_json(app(), "/api/launches/charts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selection"]["payload"]["low"], 0.0);
        assert_eq!(body["selection"]["payload"]["high"], 9600.0);

        let charts = body["charts"].as_array().unwrap();
        assert_eq!(charts[0]["kind"], "pie");
        assert_eq!(charts[1]["data"]["rows"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_launch_charts_for_one_site() {
        let (status, body) = get_json(
            app(),
            "/api/launches/charts?site=CCAFS%20LC-40&payload_low=100&payload_high=5000",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let charts = body["charts"].as_array().unwrap();
        assert_eq!(charts[0]["data"]["rows"].as_array().unwrap().len(), 2);
        assert_eq!(charts[1]["data"]["rows"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_launch_bad_payload_bound_is_json_error() {
        let (status, body) = get_json(app(), "/api/launches/charts?payload_low=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert!(body["error"]["message"].as_str().unwrap().contains("payload_low"));
    }

    #[tokio::test]
    async fn test_launch_blank_payload_bound_uses_dataset_bound() {
        let (status, body) =
            get_json(app(), "/api/launches/charts?payload_low=&payload_high=5000").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selection"]["payload"]["low"], 0.0);
        assert_eq!(body["selection"]["payload"]["high"], 5000.0);
        assert_eq!(body["charts"][1]["data"]["rows"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_dashboard_is_not_found() {
        let launches = csv(LAUNCH_CSV);
        let ctx = AppContextBuilder::new()
            .with_launches(LaunchDashboard::load(launches.path()).unwrap())
            .build()
            .unwrap();
        let (status, body) = get_json(build_router(ctx, &[]), "/api/airline/controls").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
