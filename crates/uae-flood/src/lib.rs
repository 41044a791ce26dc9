//! Flood risk and cloud-seeding decision support for the seven UAE emirates.

pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod history;
pub mod providers;
pub mod telemetry;

pub use config::AppConfig;
pub use dashboard::{dashboard_router, DashboardService};
pub use engine::ScoringEngine;
pub use error::AppError;
