//! Flood, cloud-seeding, agriculture and hydropower scoring.
//!
//! Every function here is a pure computation over a [`SiteConditions`] copy. The only side
//! effect the engine knows about is appending to a caller-owned [`AlertHistory`].

mod agriculture;
pub mod domain;
mod flood;
mod hydropower;
mod seeding;

#[cfg(test)]
mod tests;

pub use agriculture::{
    agriculture_insights, assess_agriculture, rank_agriculture, recommended_crops,
    suitability_tier, AgricultureAssessment, AgricultureInsights, SuitabilityTier,
};
pub use domain::{
    emirates, find_location, CloudCategory, GeoPoint, Location, LocationId, RiskCategory,
    SiteConditions, WeatherSnapshot,
};
pub use flood::{
    assess_flood, flood_risk_score, FloodAssessment, FloodComponent, FloodFactor, FloodInputs,
    RiskAssessment, RiskSource,
};
pub use hydropower::{
    assess_hydropower, estimated_capacity_kw, hydropower_insights, hydropower_tier,
    rank_hydropower, water_flow_score, HydropowerAssessment, HydropowerInsights, HydropowerTier,
    PlantType,
};
pub use seeding::{evaluate_seeding, is_seedable, SeedingAnalysis, SeedingDecision};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::{Alert, AlertHistory, AlertKind};

/// Stateless facade over the four scorers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn flood(&self, site: &SiteConditions) -> FloodAssessment {
        assess_flood(&FloodInputs::from(site))
    }

    /// Seeding decision using the locally derived flood risk.
    pub fn seeding(&self, site: &SiteConditions) -> SeedingAnalysis {
        let risk = self.flood(site).category;
        evaluate_seeding(site, risk)
    }

    /// Runs the decision tree and appends an alert when the result is a flood warning.
    pub fn seeding_with_alerts(
        &self,
        site: &SiteConditions,
        flood_risk: RiskCategory,
        alerts: &mut AlertHistory,
        at: DateTime<Utc>,
    ) -> SeedingAnalysis {
        let analysis = evaluate_seeding(site, flood_risk);
        if analysis.decision == SeedingDecision::FloodWarning {
            alerts.push(flood_warning_alert(
                site.name(),
                "High flood risk detected. Seeding operation cancelled.",
                at,
            ));
        }
        analysis
    }

    pub fn agriculture(&self, site: &SiteConditions) -> AgricultureAssessment {
        assess_agriculture(site)
    }

    pub fn hydropower(&self, site: &SiteConditions) -> HydropowerAssessment {
        assess_hydropower(site)
    }

    pub fn assess(&self, site: &SiteConditions) -> LocationAssessment {
        let flood = self.flood(site);
        let seeding = evaluate_seeding(site, flood.category);
        LocationAssessment {
            location_id: site.location.id.clone(),
            flood,
            seeding,
            agriculture: assess_agriculture(site),
            hydropower: assess_hydropower(site),
        }
    }
}

pub(crate) fn flood_warning_alert(location: &str, message: &str, at: DateTime<Utc>) -> Alert {
    Alert {
        timestamp: at,
        location: location.to_string(),
        kind: AlertKind::FloodWarning,
        message: message.to_string(),
    }
}

/// All four derived outputs for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAssessment {
    pub location_id: LocationId,
    pub flood: FloodAssessment,
    pub seeding: SeedingAnalysis,
    pub agriculture: AgricultureAssessment,
    pub hydropower: HydropowerAssessment,
}
