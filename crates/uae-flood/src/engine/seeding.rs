use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::{RiskCategory, SiteConditions};

pub const MIN_SEEDING_CLOUD_COVER: f64 = 50.0;
pub const MIN_SEEDING_HUMIDITY: f64 = 60.0;
/// Share of cloud cover expected to fall as extra rain once seeded.
pub const SEEDING_YIELD_FACTOR: f64 = 0.3;
pub const FLOOD_WARNING_TOTAL_RAIN_MM: f64 = 35.0;
pub const CAUTION_TOTAL_RAIN_MM: f64 = 25.0;
pub const MIN_SAFE_DRAINAGE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeedingDecision {
    NotSeedable,
    FloodWarning,
    Caution,
    Proceed,
}

impl SeedingDecision {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotSeedable => "NOT_SEEDABLE",
            Self::FloodWarning => "FLOOD_WARNING",
            Self::Caution => "CAUTION",
            Self::Proceed => "PROCEED",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "NOT_SEEDABLE" => Some(Self::NotSeedable),
            "FLOOD_WARNING" => Some(Self::FloodWarning),
            "CAUTION" => Some(Self::Caution),
            "PROCEED" => Some(Self::Proceed),
            _ => None,
        }
    }

    /// Fixed confidence attached by the local decision tree.
    pub const fn confidence(self) -> u8 {
        match self {
            Self::NotSeedable => 95,
            Self::FloodWarning => 92,
            Self::Caution => 85,
            Self::Proceed => 88,
        }
    }

    pub fn recommendation(self, location_name: &str) -> String {
        match self {
            Self::NotSeedable => {
                format!("Cloud conditions not suitable for seeding in {location_name}.")
            }
            Self::FloodWarning => format!(
                "CRITICAL ALERT: High flood risk in {location_name}. Cloud seeding PROHIBITED. Government authorities notified immediately."
            ),
            Self::Caution => format!(
                "MODERATE RISK: Proceed with monitored seeding in {location_name}. Continuous surveillance required."
            ),
            Self::Proceed => format!(
                "SAFE TO PROCEED: Cloud seeding approved for {location_name}. Optimal conditions detected."
            ),
        }
    }
}

impl fmt::Display for SeedingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of one pass through the seeding decision tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedingAnalysis {
    pub decision: SeedingDecision,
    pub confidence: u8,
    pub eligible: bool,
    pub flood_risk: RiskCategory,
    pub predicted_additional_rain_mm: f64,
    pub total_potential_rain_mm: f64,
    pub rationale: Vec<String>,
}

pub fn is_seedable(site: &SiteConditions) -> bool {
    site.snapshot.cloud_cover > MIN_SEEDING_CLOUD_COVER
        && site.snapshot.humidity > MIN_SEEDING_HUMIDITY
        && site.snapshot.cloud_category.is_seedable()
}

/// Walks the gate, flood-warning, caution and proceed branches in that order.
pub fn evaluate_seeding(site: &SiteConditions, flood_risk: RiskCategory) -> SeedingAnalysis {
    let snapshot = &site.snapshot;
    let eligible = is_seedable(site);
    let predicted = if eligible {
        (snapshot.cloud_cover * SEEDING_YIELD_FACTOR).round()
    } else {
        0.0
    };
    let total = snapshot.rainfall_mm + predicted;

    let (decision, rationale) = if !eligible {
        (SeedingDecision::NotSeedable, ineligible_rationale(site))
    } else if flood_risk == RiskCategory::High
        || total > FLOOD_WARNING_TOTAL_RAIN_MM
        || site.drainage() < MIN_SAFE_DRAINAGE
    {
        (
            SeedingDecision::FloodWarning,
            flood_warning_rationale(site, flood_risk, predicted, total),
        )
    } else if flood_risk == RiskCategory::Medium || total > CAUTION_TOTAL_RAIN_MM {
        (
            SeedingDecision::Caution,
            caution_rationale(site, flood_risk, predicted, total),
        )
    } else {
        (SeedingDecision::Proceed, proceed_rationale(site, predicted))
    };

    SeedingAnalysis {
        decision,
        confidence: decision.confidence(),
        eligible,
        flood_risk,
        predicted_additional_rain_mm: predicted,
        total_potential_rain_mm: total,
        rationale,
    }
}

fn ineligible_rationale(site: &SiteConditions) -> Vec<String> {
    let snapshot = &site.snapshot;
    let mut reasons = Vec::new();

    if !snapshot.cloud_category.is_seedable() {
        reasons.push(format!(
            "Cloud type {} is not seedable (requires Cumulus or Cumulonimbus)",
            snapshot.cloud_category
        ));
    }
    if snapshot.cloud_cover <= MIN_SEEDING_CLOUD_COVER {
        reasons.push(format!(
            "Cloud cover {}% does not exceed the {MIN_SEEDING_CLOUD_COVER}% minimum",
            snapshot.cloud_cover
        ));
    }
    if snapshot.humidity <= MIN_SEEDING_HUMIDITY {
        reasons.push(format!(
            "Humidity {}% does not exceed the {MIN_SEEDING_HUMIDITY}% minimum",
            snapshot.humidity
        ));
    }

    reasons.push(format!("Temperature: {}°C", snapshot.temperature_c));
    reasons.push(format!(
        "Wind speed: {:.1}m/s",
        snapshot.wind_speed_display()
    ));
    reasons
}

fn flood_warning_rationale(
    site: &SiteConditions,
    flood_risk: RiskCategory,
    predicted: f64,
    total: f64,
) -> Vec<String> {
    let snapshot = &site.snapshot;
    let mut reasons = Vec::new();

    if flood_risk == RiskCategory::High {
        reasons.push("Flood risk is already high".to_string());
    }
    if total > FLOOD_WARNING_TOTAL_RAIN_MM {
        reasons.push(format!(
            "Total potential rainfall {total}mm exceeds the {FLOOD_WARNING_TOTAL_RAIN_MM}mm safety threshold"
        ));
    }
    if site.drainage() < MIN_SAFE_DRAINAGE {
        reasons.push(format!(
            "Drainage capacity {}% is below the {MIN_SAFE_DRAINAGE}% minimum",
            site.drainage()
        ));
    }

    reasons.push(format!("Current rainfall: {}mm", snapshot.rainfall_mm));
    reasons.push(format!("Predicted seeding impact: +{predicted}mm"));
    reasons.push(format!("Soil moisture: {}%", site.soil_moisture()));
    reasons.push(format!(
        "Humidity: {}% | Temperature: {}°C",
        snapshot.humidity, snapshot.temperature_c
    ));
    reasons.push(format!(
        "Wind speed: {:.1}m/s",
        snapshot.wind_speed_display()
    ));
    reasons
}

fn caution_rationale(
    site: &SiteConditions,
    flood_risk: RiskCategory,
    predicted: f64,
    total: f64,
) -> Vec<String> {
    let snapshot = &site.snapshot;
    let mut reasons = Vec::new();

    if flood_risk == RiskCategory::Medium {
        reasons.push("Flood risk is medium".to_string());
    }
    if total > CAUTION_TOTAL_RAIN_MM {
        reasons.push(format!(
            "Total potential rainfall {total}mm exceeds the {CAUTION_TOTAL_RAIN_MM}mm caution threshold"
        ));
    }

    reasons.push(format!(
        "Cloud type {} is suitable for seeding",
        snapshot.cloud_category
    ));
    reasons.push(format!("Predicted rainfall increase: +{predicted}mm"));
    reasons.push(format!(
        "Drainage capacity: {}% - monitor closely",
        site.drainage()
    ));
    reasons.push(format!(
        "Conditions: {}°C, {}% humidity, wind {:.1}m/s",
        snapshot.temperature_c,
        snapshot.humidity,
        snapshot.wind_speed_display()
    ));
    reasons.push("Recommendation: reduced seeding intensity with real-time monitoring".to_string());
    reasons
}

fn proceed_rationale(site: &SiteConditions, predicted: f64) -> Vec<String> {
    let snapshot = &site.snapshot;
    vec![
        format!("Favorable cloud conditions ({})", snapshot.cloud_category),
        format!(
            "Safe rainfall levels: current {}mm + predicted {predicted}mm",
            snapshot.rainfall_mm
        ),
        format!("Low flood risk: drainage capacity {}%", site.drainage()),
        format!("Soil moisture acceptable: {}%", site.soil_moisture()),
        format!(
            "Conditions: {}°C, {}% humidity, wind {:.1}m/s",
            snapshot.temperature_c,
            snapshot.humidity,
            snapshot.wind_speed_display()
        ),
    ]
}
