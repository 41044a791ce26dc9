//! Explicit dashboard state and the service that drives the engine from provider data.

mod record;
mod report;
mod router;
mod service;
mod state;

#[cfg(test)]
mod tests;

pub use record::{DecisionPath, DecisionRecord};
pub use report::{render_report, report_file_name, DecisionReport};
pub use router::dashboard_router;
pub use service::{
    AgricultureOverview, DashboardError, DashboardService, HydropowerOverview, LocationView,
    Overview, RefreshOutcome, DEFAULT_FETCH_TIMEOUT,
};
pub use state::{
    DashboardState, DataMode, DecisionMode, ModeIndicator, RainfallSimulation, StoredSnapshot,
    DEFAULT_SIMULATED_RAINFALL_MM,
};
