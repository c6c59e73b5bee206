//! # App Context
//!
//! Loaded dashboards shared across request handlers. Each dashboard owns a
//! blocking DuckDB connection, so work on it runs on the blocking pool behind
//! a mutex.

use std::path::Path;
use std::sync::{Arc, Mutex};

use dash_analytics::{AirlineDashboard, LaunchDashboard};

use crate::config::{Config, ConfigError};
use crate::error::{ApiError, ApiResult};

/// A dashboard shared between handlers.
pub type SharedDashboard<D> = Arc<Mutex<D>>;

/// Application context shared across all handlers
#[derive(Clone, Default)]
pub struct AppContext {
    /// Airline performance dashboard, when its data was loaded
    pub airline: Option<SharedDashboard<AirlineDashboard>>,

    /// Launch records dashboard, when its data was loaded
    pub launches: Option<SharedDashboard<LaunchDashboard>>,
}

impl AppContext {
    /// Load every dashboard the configuration names.
    pub fn load(config: &Config) -> anyhow::Result<Self> {
        config.ensure_datasets()?;
        let mut builder = AppContextBuilder::new();

        if let Some(path) = &config.airline_data {
            builder = builder.with_airline(load_airline(path)?);
        }
        if let Some(path) = &config.launch_data {
            builder = builder.with_launches(load_launches(path)?);
        }

        Ok(builder.build()?)
    }

    /// Airline dashboard or a not-found error.
    pub fn airline(&self) -> ApiResult<SharedDashboard<AirlineDashboard>> {
        self.airline
            .clone()
            .ok_or(ApiError::DashboardUnavailable { dashboard: "airline" })
    }

    /// Launch dashboard or a not-found error.
    pub fn launches(&self) -> ApiResult<SharedDashboard<LaunchDashboard>> {
        self.launches
            .clone()
            .ok_or(ApiError::DashboardUnavailable { dashboard: "launches" })
    }
}

/// Load the airline CSV, logging what was read.
pub fn load_airline(path: &Path) -> anyhow::Result<AirlineDashboard> {
    tracing::info!(path = %path.display(), "Loading airline data");
    let dashboard = AirlineDashboard::load(path)?;
    tracing::info!(rows = dashboard.engine().row_count()?, "Airline data loaded");
    Ok(dashboard)
}

/// Load the launch CSV, logging what was read.
pub fn load_launches(path: &Path) -> anyhow::Result<LaunchDashboard> {
    tracing::info!(path = %path.display(), "Loading launch data");
    let dashboard = LaunchDashboard::load(path)?;
    tracing::info!(
        rows = dashboard.engine().row_count()?,
        sites = dashboard.sites().len(),
        "Launch data loaded"
    );
    Ok(dashboard)
}

/// Run `f` against a shared dashboard on the blocking pool.
pub async fn with_dashboard<D, T, F>(dashboard: SharedDashboard<D>, f: F) -> ApiResult<T>
where
    D: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&D) -> ApiResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let guard = dashboard
            .lock()
            .map_err(|_| ApiError::Internal("dashboard lock poisoned".to_string()))?;
        f(&guard)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
}

/// Builder for `AppContext`
#[derive(Default)]
pub struct AppContextBuilder {
    airline: Option<AirlineDashboard>,
    launches: Option<LaunchDashboard>,
}

impl AppContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_airline(mut self, dashboard: AirlineDashboard) -> Self {
        self.airline = Some(dashboard);
        self
    }

    #[must_use]
    pub fn with_launches(mut self, dashboard: LaunchDashboard) -> Self {
        self.launches = Some(dashboard);
        self
    }

    pub fn build(self) -> Result<AppContext, ConfigError> {
        if self.airline.is_none() && self.launches.is_none() {
            return Err(ConfigError::NoDatasets);
        }
        Ok(AppContext {
            airline: self.airline.map(|d| Arc::new(Mutex::new(d))),
            launches: self.launches.map(|d| Arc::new(Mutex::new(d))),
        })
    }
}
