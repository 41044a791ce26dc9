use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::record::DecisionRecord;
use super::report::DecisionReport;
use super::state::{DashboardState, DecisionMode, ModeIndicator, RainfallSimulation};
use crate::engine::{
    agriculture_insights, emirates, find_location, flood_warning_alert, hydropower_insights,
    rank_agriculture, rank_hydropower, AgricultureAssessment, AgricultureInsights,
    FloodAssessment, HydropowerAssessment, HydropowerInsights, Location, LocationId,
    RiskAssessment, ScoringEngine, SiteConditions, WeatherSnapshot,
};
use crate::history::{Alert, Notice};
use crate::providers::{
    DecisionBackend, DecisionRequest, ProviderError, SnapshotOrigin, WeatherProvider,
};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const REMOTE_FLOOD_ALERT: &str =
    "Remote decision service detected high flood risk. Seeding cancelled.";

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("unknown location '{0}'")]
    UnknownLocation(String),
    #[error("no seeding analysis has been run yet")]
    NoDecisionYet,
}

/// One location's current conditions with the flood label on display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationView {
    pub location: Location,
    pub conditions: WeatherSnapshot,
    pub origin: SnapshotOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
    pub flood_risk: RiskAssessment,
    pub flood: FloodAssessment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub mode: ModeIndicator,
    pub locations: Vec<LocationView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgricultureOverview {
    pub mode: ModeIndicator,
    pub ranking: Vec<AgricultureAssessment>,
    pub insights: AgricultureInsights,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydropowerOverview {
    pub mode: ModeIndicator,
    pub ranking: Vec<HydropowerAssessment>,
    pub insights: HydropowerInsights,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshOutcome {
    pub location_id: LocationId,
    pub origin: SnapshotOrigin,
}

/// Owns dashboard state and runs the engine against provider data.
pub struct DashboardService<W, D> {
    weather: Arc<W>,
    backend: Arc<D>,
    engine: ScoringEngine,
    fetch_timeout: Duration,
    state: Mutex<DashboardState>,
}

impl<W, D> DashboardService<W, D>
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    pub fn new(weather: Arc<W>, backend: Arc<D>) -> Self {
        Self::with_timeout(weather, backend, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(weather: Arc<W>, backend: Arc<D>, fetch_timeout: Duration) -> Self {
        Self {
            weather,
            backend,
            engine: ScoringEngine::new(),
            fetch_timeout,
            state: Mutex::new(DashboardState::new()),
        }
    }

    /// The guard never crosses an `.await`; a poisoned lock still holds usable state.
    fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn resolve(id: &str) -> Result<&'static Location, DashboardError> {
        find_location(id).ok_or_else(|| DashboardError::UnknownLocation(id.to_string()))
    }

    /// Fetches every location concurrently; failures and timeouts store the fallback snapshot.
    pub async fn refresh_weather(&self) -> Vec<RefreshOutcome> {
        let mut tasks = JoinSet::new();
        for location in emirates() {
            let weather = Arc::clone(&self.weather);
            let timeout = self.fetch_timeout;
            tasks.spawn(async move {
                let result = tokio::time::timeout(timeout, weather.fetch(location)).await;
                (location, result)
            });
        }

        let mut fetched = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((location, result)) => {
                    fetched.insert(location.id.clone(), result);
                }
                Err(err) => warn!(error = %err, "weather fetch task aborted"),
            }
        }

        let origin = self.weather.origin();
        let now = Utc::now();
        let mut outcomes = Vec::with_capacity(emirates().len());
        let mut state = self.state();

        for location in emirates() {
            let failure = match fetched.remove(&location.id) {
                Some(Ok(Ok(snapshot))) => {
                    state.store_snapshot(location.id.clone(), snapshot.clamped(), origin, now);
                    outcomes.push(RefreshOutcome {
                        location_id: location.id.clone(),
                        origin,
                    });
                    continue;
                }
                Some(Ok(Err(err))) => err.to_string(),
                Some(Err(_elapsed)) => format!(
                    "weather request timed out after {}s",
                    self.fetch_timeout.as_secs_f64()
                ),
                None => "weather fetch task did not complete".to_string(),
            };

            warn!(location = %location.id, reason = %failure, "using fallback weather");
            state.store_snapshot(
                location.id.clone(),
                WeatherSnapshot::fallback(),
                SnapshotOrigin::Fallback,
                now,
            );
            state.notice(
                format!(
                    "{}: live weather unavailable ({failure}); showing fallback values",
                    location.name
                ),
                now,
            );
            outcomes.push(RefreshOutcome {
                location_id: location.id.clone(),
                origin: SnapshotOrigin::Fallback,
            });
        }

        info!(data_mode = state.data_mode().label(), "weather refresh complete");
        outcomes
    }

    pub fn site_conditions(&self, id: &str) -> Result<SiteConditions, DashboardError> {
        let location = Self::resolve(id)?;
        Ok(self.state().site_conditions(location))
    }

    fn view(&self, state: &DashboardState, location: &Location) -> LocationView {
        let site = state.site_conditions(location);
        let stored = state.stored(&location.id);
        LocationView {
            location: location.clone(),
            origin: stored
                .map(|stored| stored.origin)
                .unwrap_or(SnapshotOrigin::Pending),
            observed_at: stored.and_then(|stored| stored.observed_at),
            flood_risk: state.flood_risk(&site),
            flood: self.engine.flood(&site),
            conditions: site.snapshot,
        }
    }

    pub fn overview(&self) -> Overview {
        let state = self.state();
        Overview {
            mode: state.mode_indicator(self.backend.is_configured()),
            locations: emirates()
                .iter()
                .map(|location| self.view(&state, location))
                .collect(),
        }
    }

    pub fn location(&self, id: &str) -> Result<LocationView, DashboardError> {
        let location = Self::resolve(id)?;
        let state = self.state();
        Ok(self.view(&state, location))
    }

    /// Runs the seeding analysis for one location through the active decision path.
    pub async fn analyze(&self, id: &str) -> Result<DecisionRecord, DashboardError> {
        let location = Self::resolve(id)?;
        let (site, mode) = {
            let state = self.state();
            (state.site_conditions(location), state.decision_mode())
        };

        if mode == DecisionMode::Remote {
            let request = DecisionRequest::from(&site);
            match self.backend.analyze(&request).await {
                Ok(remote) => {
                    let now = Utc::now();
                    let record = DecisionRecord::remote(&site, &remote, now);
                    let mut state = self.state();
                    if state.decision_mode() == DecisionMode::Remote {
                        state.set_remote_risk(location.id.clone(), record.flood_risk);
                    }
                    if record.is_flood_warning() {
                        state
                            .alerts
                            .push(flood_warning_alert(&location.name, REMOTE_FLOOD_ALERT, now));
                    }
                    state.analyses.push(record.clone());
                    info!(
                        location = %location.id,
                        decision = %record.decision,
                        probability = remote.flood_probability,
                        "remote seeding analysis"
                    );
                    return Ok(record);
                }
                Err(err) => self.fall_back_to_local(location, &err),
            }
        }

        let now = Utc::now();
        let mut state = self.state();
        let site = state.site_conditions(location);
        let flood_risk = RiskAssessment::local(self.engine.flood(&site).score);
        let analysis =
            self.engine
                .seeding_with_alerts(&site, flood_risk.category, &mut state.alerts, now);
        let record = DecisionRecord::local(&site, &analysis, flood_risk, now);
        state.analyses.push(record.clone());
        info!(
            location = %location.id,
            decision = %record.decision,
            "local seeding analysis"
        );
        Ok(record)
    }

    fn fall_back_to_local(&self, location: &Location, err: &ProviderError) {
        warn!(
            location = %location.id,
            error = %err,
            "remote decision failed, reverting to local"
        );
        let mut state = self.state();
        state.set_decision_mode(DecisionMode::Local);
        state.notice(
            format!(
                "Remote decision service unavailable ({err}); switched to the local decision tree"
            ),
            Utc::now(),
        );
    }

    /// Scores every location through the backend and stores the derived risk labels.
    pub async fn refresh_remote_risk(&self) -> usize {
        let sites = {
            let state = self.state();
            if state.decision_mode() != DecisionMode::Remote {
                return 0;
            }
            state.sites()
        };

        let mut tasks = JoinSet::new();
        for site in sites {
            let backend = Arc::clone(&self.backend);
            tasks.spawn(async move {
                let request = DecisionRequest::from(&site);
                let result = backend.analyze(&request).await;
                (site.location, result)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(err) => warn!(error = %err, "remote risk task aborted"),
            }
        }

        let now = Utc::now();
        let mut state = self.state();
        if state.decision_mode() != DecisionMode::Remote {
            debug!("decision mode changed during remote refresh; discarding labels");
            return 0;
        }

        let mut stored = 0;
        for (location, result) in results {
            match result {
                Ok(remote) => {
                    state.set_remote_risk(location.id.clone(), remote.risk());
                    stored += 1;
                }
                Err(err) => {
                    warn!(location = %location.id, error = %err, "remote risk unavailable");
                    state.notice(
                        format!(
                            "{}: remote risk unavailable ({err}); keeping local label",
                            location.name
                        ),
                        now,
                    );
                }
            }
        }
        stored
    }

    pub fn set_decision_mode(&self, mode: DecisionMode) -> ModeIndicator {
        let mut state = self.state();
        state.set_decision_mode(mode);
        info!(decision_mode = mode.label(), "decision mode changed");
        state.mode_indicator(self.backend.is_configured())
    }

    pub fn set_simulation(&self, simulation: RainfallSimulation) -> ModeIndicator {
        let mut state = self.state();
        state.set_simulation(simulation);
        state.mode_indicator(self.backend.is_configured())
    }

    pub fn mode_indicator(&self) -> ModeIndicator {
        self.state().mode_indicator(self.backend.is_configured())
    }

    pub fn agriculture(&self) -> AgricultureOverview {
        let state = self.state();
        let sites = state.sites();
        AgricultureOverview {
            mode: state.mode_indicator(self.backend.is_configured()),
            ranking: rank_agriculture(&sites),
            insights: agriculture_insights(&sites),
        }
    }

    pub fn hydropower(&self) -> HydropowerOverview {
        let state = self.state();
        let sites = state.sites();
        HydropowerOverview {
            mode: state.mode_indicator(self.backend.is_configured()),
            ranking: rank_hydropower(&sites),
            insights: hydropower_insights(&sites),
        }
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.state().alerts.to_vec()
    }

    pub fn history(&self) -> Vec<DecisionRecord> {
        self.state().analyses.to_vec()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.state().notices.to_vec()
    }

    pub fn latest_decision(&self) -> Option<DecisionRecord> {
        self.state().analyses.latest().cloned()
    }

    pub fn latest_report(&self, now: DateTime<Utc>) -> Result<DecisionReport, DashboardError> {
        let record = self.latest_decision().ok_or(DashboardError::NoDecisionYet)?;
        Ok(DecisionReport::render(&record, now))
    }
}
