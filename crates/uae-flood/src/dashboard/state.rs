use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::DecisionRecord;
use crate::engine::{
    emirates, flood_risk_score, FloodInputs, Location, LocationId, RiskAssessment,
    SiteConditions, WeatherSnapshot,
};
use crate::history::{
    AlertHistory, BoundedHistory, Notice, ANALYSIS_HISTORY_CAP, NOTICE_HISTORY_CAP,
};
use crate::providers::SnapshotOrigin;

pub const DEFAULT_SIMULATED_RAINFALL_MM: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionMode {
    #[default]
    Local,
    Remote,
}

impl DecisionMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for DecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operator override for rainfall; only honored while the decision mode is remote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainfallSimulation {
    pub enabled: bool,
    #[serde(default = "default_simulated_rainfall")]
    pub rainfall_mm: f64,
}

fn default_simulated_rainfall() -> f64 {
    DEFAULT_SIMULATED_RAINFALL_MM
}

impl Default for RainfallSimulation {
    fn default() -> Self {
        Self {
            enabled: false,
            rainfall_mm: DEFAULT_SIMULATED_RAINFALL_MM,
        }
    }
}

impl RainfallSimulation {
    pub fn enabled(rainfall_mm: f64) -> Self {
        Self {
            enabled: true,
            rainfall_mm,
        }
    }
}

/// Aggregate origin of the snapshots currently on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMode {
    Live,
    Fallback,
    Demo,
    Pending,
    Mixed,
}

impl DataMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Fallback => "fallback",
            Self::Demo => "demo",
            Self::Pending => "pending",
            Self::Mixed => "mixed",
        }
    }
}

impl From<SnapshotOrigin> for DataMode {
    fn from(origin: SnapshotOrigin) -> Self {
        match origin {
            SnapshotOrigin::Live => Self::Live,
            SnapshotOrigin::Fallback => Self::Fallback,
            SnapshotOrigin::Demo => Self::Demo,
            SnapshotOrigin::Pending => Self::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeIndicator {
    pub data_mode: DataMode,
    pub decision_mode: DecisionMode,
    pub simulation: RainfallSimulation,
    pub remote_configured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSnapshot {
    pub snapshot: WeatherSnapshot,
    pub origin: SnapshotOrigin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl StoredSnapshot {
    pub fn pending() -> Self {
        Self {
            snapshot: WeatherSnapshot::pending(),
            origin: SnapshotOrigin::Pending,
            observed_at: None,
        }
    }
}

/// Everything the dashboard remembers between requests.
#[derive(Debug, Clone)]
pub struct DashboardState {
    snapshots: BTreeMap<LocationId, StoredSnapshot>,
    decision_mode: DecisionMode,
    simulation: RainfallSimulation,
    remote_risk: HashMap<LocationId, RiskAssessment>,
    pub(crate) alerts: AlertHistory,
    pub(crate) analyses: BoundedHistory<DecisionRecord>,
    pub(crate) notices: BoundedHistory<Notice>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        let snapshots = emirates()
            .iter()
            .map(|location| (location.id.clone(), StoredSnapshot::pending()))
            .collect();

        Self {
            snapshots,
            decision_mode: DecisionMode::Local,
            simulation: RainfallSimulation::default(),
            remote_risk: HashMap::new(),
            alerts: AlertHistory::alerts(),
            analyses: BoundedHistory::with_cap(ANALYSIS_HISTORY_CAP),
            notices: BoundedHistory::with_cap(NOTICE_HISTORY_CAP),
        }
    }

    pub fn decision_mode(&self) -> DecisionMode {
        self.decision_mode
    }

    pub fn simulation(&self) -> RainfallSimulation {
        self.simulation
    }

    /// Leaving remote mode discards every remote risk label.
    pub fn set_decision_mode(&mut self, mode: DecisionMode) {
        if mode == DecisionMode::Local {
            self.remote_risk.clear();
        }
        self.decision_mode = mode;
    }

    /// Remote labels were scored against the previous rainfall, so a change drops them.
    pub fn set_simulation(&mut self, simulation: RainfallSimulation) {
        let rainfall_mm = if simulation.rainfall_mm.is_finite() {
            simulation.rainfall_mm.max(0.0)
        } else {
            DEFAULT_SIMULATED_RAINFALL_MM
        };
        let simulation = RainfallSimulation {
            enabled: simulation.enabled,
            rainfall_mm,
        };
        if simulation != self.simulation {
            self.remote_risk.clear();
        }
        self.simulation = simulation;
    }

    pub fn store_snapshot(
        &mut self,
        id: LocationId,
        snapshot: WeatherSnapshot,
        origin: SnapshotOrigin,
        at: DateTime<Utc>,
    ) {
        self.snapshots.insert(
            id,
            StoredSnapshot {
                snapshot,
                origin,
                observed_at: Some(at),
            },
        );
    }

    pub fn stored(&self, id: &LocationId) -> Option<&StoredSnapshot> {
        self.snapshots.get(id)
    }

    /// Rainfall simulation applies only while remote decisions are active.
    pub fn simulation_active(&self) -> bool {
        self.decision_mode == DecisionMode::Remote && self.simulation.enabled
    }

    /// Location joined with its current snapshot, simulation applied.
    pub fn site_conditions(&self, location: &Location) -> SiteConditions {
        let snapshot = self
            .snapshots
            .get(&location.id)
            .map(|stored| stored.snapshot.clone())
            .unwrap_or_else(WeatherSnapshot::pending);

        let snapshot = if self.simulation_active() {
            snapshot.with_rainfall(self.simulation.rainfall_mm)
        } else {
            snapshot
        };

        SiteConditions::new(location.clone(), snapshot)
    }

    pub fn sites(&self) -> Vec<SiteConditions> {
        emirates()
            .iter()
            .map(|location| self.site_conditions(location))
            .collect()
    }

    pub fn set_remote_risk(&mut self, id: LocationId, risk: RiskAssessment) {
        self.remote_risk.insert(id, risk);
    }

    pub fn remote_risk(&self, id: &LocationId) -> Option<RiskAssessment> {
        self.remote_risk.get(id).copied()
    }

    /// Remote label when one is held, else the local weighted score.
    pub fn flood_risk(&self, site: &SiteConditions) -> RiskAssessment {
        self.remote_risk(&site.location.id).unwrap_or_else(|| {
            RiskAssessment::local(flood_risk_score(&FloodInputs::from(site)))
        })
    }

    pub fn data_mode(&self) -> DataMode {
        let mut origins = self.snapshots.values().map(|stored| stored.origin);
        let Some(first) = origins.next() else {
            return DataMode::Pending;
        };
        if origins.all(|origin| origin == first) {
            DataMode::from(first)
        } else {
            DataMode::Mixed
        }
    }

    pub fn mode_indicator(&self, remote_configured: bool) -> ModeIndicator {
        ModeIndicator {
            data_mode: self.data_mode(),
            decision_mode: self.decision_mode,
            simulation: self.simulation,
            remote_configured,
        }
    }

    pub fn notice(&mut self, message: impl Into<String>, at: DateTime<Utc>) {
        self.notices.push(Notice {
            timestamp: at,
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{find_location, RiskCategory};

    fn dubai() -> &'static Location {
        find_location("dubai").expect("dubai is a reference location")
    }

    #[test]
    fn starts_pending_and_local() {
        let state = DashboardState::new();
        assert_eq!(state.data_mode(), DataMode::Pending);
        assert_eq!(state.decision_mode(), DecisionMode::Local);
        assert_eq!(state.simulation().rainfall_mm, DEFAULT_SIMULATED_RAINFALL_MM);
        assert!(!state.simulation().enabled);
    }

    #[test]
    fn simulation_only_applies_in_remote_mode() {
        let mut state = DashboardState::new();
        state.store_snapshot(
            dubai().id.clone(),
            WeatherSnapshot::fallback(),
            SnapshotOrigin::Live,
            Utc::now(),
        );
        state.set_simulation(RainfallSimulation::enabled(40.0));

        assert_eq!(state.site_conditions(dubai()).rainfall(), 0.0);

        state.set_decision_mode(DecisionMode::Remote);
        assert_eq!(state.site_conditions(dubai()).rainfall(), 40.0);
        assert_eq!(state.stored(&dubai().id).map(|s| s.snapshot.rainfall_mm), Some(0.0));
    }

    #[test]
    fn leaving_remote_mode_clears_remote_labels() {
        let mut state = DashboardState::new();
        state.set_decision_mode(DecisionMode::Remote);
        state.set_remote_risk(dubai().id.clone(), RiskAssessment::remote(80.0));

        let site = state.site_conditions(dubai());
        assert_eq!(state.flood_risk(&site).category, RiskCategory::High);
        assert!(state.flood_risk(&site).source.is_remote());

        state.set_decision_mode(DecisionMode::Local);
        let local = state.flood_risk(&site);
        assert!(!local.source.is_remote());
    }

    #[test]
    fn mixed_origins_report_mixed() {
        let mut state = DashboardState::new();
        for location in emirates() {
            state.store_snapshot(
                location.id.clone(),
                WeatherSnapshot::fallback(),
                SnapshotOrigin::Live,
                Utc::now(),
            );
        }
        assert_eq!(state.data_mode(), DataMode::Live);

        state.store_snapshot(
            dubai().id.clone(),
            WeatherSnapshot::fallback(),
            SnapshotOrigin::Fallback,
            Utc::now(),
        );
        assert_eq!(state.data_mode(), DataMode::Mixed);
    }

    #[test]
    fn negative_simulated_rainfall_is_clamped() {
        let mut state = DashboardState::new();
        state.set_simulation(RainfallSimulation::enabled(-5.0));
        assert_eq!(state.simulation().rainfall_mm, 0.0);
    }

    #[test]
    fn changing_the_simulation_drops_remote_labels() {
        let mut state = DashboardState::new();
        state.set_decision_mode(DecisionMode::Remote);
        state.set_remote_risk(dubai().id.clone(), RiskAssessment::remote(60.0));

        state.set_simulation(RainfallSimulation::default());
        assert!(state.remote_risk(&dubai().id).is_some());

        state.set_simulation(RainfallSimulation::enabled(40.0));
        assert!(state.remote_risk(&dubai().id).is_none());
    }
}
