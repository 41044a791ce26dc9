//! Outbound adapters: weather snapshots and the remote seeding decision service.

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::engine::{Location, WeatherSnapshot};

mod decision;
mod demo;
mod weather;

pub use decision::{DecisionRequest, DecisionServiceClient, RemoteDecision};
pub use demo::DemoWeatherGenerator;
pub use weather::OpenWeatherClient;

/// Where a stored snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotOrigin {
    Live,
    Fallback,
    Demo,
    Pending,
}

impl SnapshotOrigin {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Fallback => "fallback",
            Self::Demo => "demo",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for SnapshotOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source of per-location weather snapshots.
pub trait WeatherProvider: Send + Sync + 'static {
    /// Origin tag applied to snapshots this provider returns successfully.
    fn origin(&self) -> SnapshotOrigin;

    fn fetch(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<WeatherSnapshot, ProviderError>> + Send;
}

/// Remote seeding decision service.
pub trait DecisionBackend: Send + Sync + 'static {
    fn is_configured(&self) -> bool;

    fn analyze(
        &self,
        request: &DecisionRequest,
    ) -> impl Future<Output = Result<RemoteDecision, ProviderError>> + Send;
}

/// Runtime choice between live and generated weather.
#[derive(Debug, Clone)]
pub enum WeatherSource {
    Live(OpenWeatherClient),
    Demo(DemoWeatherGenerator),
}

impl WeatherProvider for WeatherSource {
    fn origin(&self) -> SnapshotOrigin {
        match self {
            WeatherSource::Live(client) => client.origin(),
            WeatherSource::Demo(generator) => generator.origin(),
        }
    }

    fn fetch(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<WeatherSnapshot, ProviderError>> + Send {
        async move {
            match self {
                WeatherSource::Live(client) => client.fetch(location).await,
                WeatherSource::Demo(generator) => generator.fetch(location).await,
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} responded with status {status}")]
    Status { service: &'static str, status: u16 },
    #[error("{service} returned an unusable payload: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },
    #[error("{service} is not configured")]
    NotConfigured { service: &'static str },
}
