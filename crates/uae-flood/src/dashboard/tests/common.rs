use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::dashboard::{dashboard_router, DashboardService};
use crate::engine::{CloudCategory, Location, SeedingDecision, WeatherSnapshot};
use crate::providers::{
    DecisionBackend, DecisionRequest, ProviderError, RemoteDecision, SnapshotOrigin,
    WeatherProvider,
};

pub(super) const FETCH_TIMEOUT: Duration = Duration::from_millis(50);

/// Calm conditions that never trigger a warning on a well-drained site.
pub(super) fn calm_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        cloud_cover: 30.0,
        cloud_category: CloudCategory::Stratus,
        rainfall_mm: 2.0,
        humidity: 45.0,
        wind_speed: Some(3.0),
        temperature_c: 33.0,
        pressure_hpa: Some(1008.0),
    }
}

/// Seedable, wet conditions: cloud 60, humidity 70, Cumulus, 30mm.
pub(super) fn storm_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        cloud_cover: 60.0,
        cloud_category: CloudCategory::Cumulus,
        rainfall_mm: 30.0,
        humidity: 70.0,
        wind_speed: Some(8.0),
        temperature_c: 29.0,
        pressure_hpa: Some(1002.0),
    }
}

#[derive(Debug, Clone)]
pub(super) enum Script {
    Snapshot(WeatherSnapshot),
    Fail,
    Hang,
}

/// Weather provider answering from a per-location script.
#[derive(Debug, Clone)]
pub(super) struct ScriptedWeather {
    default: WeatherSnapshot,
    scripts: HashMap<String, Script>,
}

impl ScriptedWeather {
    pub(super) fn calm() -> Self {
        Self {
            default: calm_snapshot(),
            scripts: HashMap::new(),
        }
    }

    pub(super) fn with(mut self, location_id: &str, script: Script) -> Self {
        self.scripts.insert(location_id.to_string(), script);
        self
    }
}

impl WeatherProvider for ScriptedWeather {
    fn origin(&self) -> SnapshotOrigin {
        SnapshotOrigin::Live
    }

    fn fetch(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<WeatherSnapshot, ProviderError>> + Send {
        let script = self
            .scripts
            .get(location.id.as_str())
            .cloned()
            .unwrap_or_else(|| Script::Snapshot(self.default.clone()));

        async move {
            match script {
                Script::Snapshot(snapshot) => Ok(snapshot),
                Script::Fail => Err(ProviderError::Status {
                    service: "stub weather",
                    status: 503,
                }),
                Script::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(WeatherSnapshot::fallback())
                }
            }
        }
    }
}

/// Decision backend returning a fixed verdict, or failing, while recording requests.
#[derive(Debug, Default)]
pub(super) struct StubBackend {
    verdict: Option<RemoteDecision>,
    calls: AtomicUsize,
    requests: Mutex<Vec<DecisionRequest>>,
}

impl StubBackend {
    pub(super) fn answering(decision: SeedingDecision, probability: f64) -> Self {
        Self {
            verdict: Some(RemoteDecision {
                decision,
                confidence: decision.confidence(),
                flood_probability: probability,
                reasoning: vec![format!("Flood Probability: {probability:.1}%")],
            }),
            ..Self::default()
        }
    }

    pub(super) fn failing() -> Self {
        Self::default()
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn last_request(&self) -> Option<DecisionRequest> {
        self.requests.lock().expect("requests lock").last().cloned()
    }
}

impl DecisionBackend for StubBackend {
    fn is_configured(&self) -> bool {
        true
    }

    fn analyze(
        &self,
        request: &DecisionRequest,
    ) -> impl Future<Output = Result<RemoteDecision, ProviderError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        let verdict = self.verdict.clone();

        async move {
            verdict.ok_or(ProviderError::Status {
                service: "stub backend",
                status: 500,
            })
        }
    }
}

pub(super) type TestService = DashboardService<ScriptedWeather, StubBackend>;

pub(super) fn build_service(
    weather: ScriptedWeather,
    backend: StubBackend,
) -> (Arc<TestService>, Arc<StubBackend>) {
    let backend = Arc::new(backend);
    let service = DashboardService::with_timeout(
        Arc::new(weather),
        Arc::clone(&backend),
        FETCH_TIMEOUT,
    );
    (Arc::new(service), backend)
}

/// Service whose snapshots have already been refreshed once.
pub(super) async fn refreshed_service(
    weather: ScriptedWeather,
    backend: StubBackend,
) -> (Arc<TestService>, Arc<StubBackend>) {
    let (service, backend) = build_service(weather, backend);
    service.refresh_weather().await;
    (service, backend)
}

pub(super) fn router_with_service(service: Arc<TestService>) -> axum::Router {
    dashboard_router(service)
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
