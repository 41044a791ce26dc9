use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{
    LocationId, RiskAssessment, SeedingAnalysis, SeedingDecision, SiteConditions,
    WeatherSnapshot,
};
use crate::providers::RemoteDecision;

/// Which decision tree produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPath {
    Local,
    Remote,
}

/// One seeding analysis as shown to operators and exported in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub location_id: LocationId,
    pub location_name: String,
    pub decision: SeedingDecision,
    pub confidence: u8,
    pub flood_risk: RiskAssessment,
    pub recommendation: String,
    pub conditions: WeatherSnapshot,
    pub soil_moisture: f64,
    pub drainage_capacity: f64,
    pub predicted_additional_rain_mm: f64,
    pub total_potential_rain_mm: f64,
    pub rationale: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub path: DecisionPath,
}

impl DecisionRecord {
    pub fn local(
        site: &SiteConditions,
        analysis: &SeedingAnalysis,
        flood_risk: RiskAssessment,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            location_id: site.location.id.clone(),
            location_name: site.location.name.clone(),
            decision: analysis.decision,
            confidence: analysis.confidence,
            flood_risk,
            recommendation: analysis.decision.recommendation(site.name()),
            conditions: site.snapshot.clone(),
            soil_moisture: site.soil_moisture(),
            drainage_capacity: site.drainage(),
            predicted_additional_rain_mm: analysis.predicted_additional_rain_mm,
            total_potential_rain_mm: analysis.total_potential_rain_mm,
            rationale: analysis.rationale.clone(),
            timestamp: at,
            path: DecisionPath::Local,
        }
    }

    /// Remote verdicts predict no extra rain; total potential is current rainfall.
    pub fn remote(site: &SiteConditions, remote: &RemoteDecision, at: DateTime<Utc>) -> Self {
        Self {
            location_id: site.location.id.clone(),
            location_name: site.location.name.clone(),
            decision: remote.decision,
            confidence: remote.confidence,
            flood_risk: remote.risk(),
            recommendation: remote.decision.recommendation(site.name()),
            conditions: site.snapshot.clone(),
            soil_moisture: site.soil_moisture(),
            drainage_capacity: site.drainage(),
            predicted_additional_rain_mm: 0.0,
            total_potential_rain_mm: site.rainfall(),
            rationale: remote.reasoning.clone(),
            timestamp: at,
            path: DecisionPath::Remote,
        }
    }

    pub fn is_flood_warning(&self) -> bool {
        self.decision == SeedingDecision::FloodWarning
    }
}
