use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::{LocationId, SiteConditions};

/// Rainfall above which a site is flagged as a high agricultural priority.
pub const PRIORITY_RAINFALL_MM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SuitabilityTier {
    Poor,
    Moderate,
    Good,
    Excellent,
}

impl SuitabilityTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Moderate => "Moderate",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for SuitabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct TierRule {
    tier: SuitabilityTier,
    rainfall_above: f64,
    soil_above: f64,
    require_both: bool,
}

/// Tier ladder, checked top-down.
static TIER_RULES: [TierRule; 3] = [
    TierRule {
        tier: SuitabilityTier::Excellent,
        rainfall_above: 15.0,
        soil_above: 40.0,
        require_both: true,
    },
    TierRule {
        tier: SuitabilityTier::Good,
        rainfall_above: 10.0,
        soil_above: 30.0,
        require_both: false,
    },
    TierRule {
        tier: SuitabilityTier::Moderate,
        rainfall_above: 5.0,
        soil_above: 20.0,
        require_both: false,
    },
];

/// Crop advice keyed on rainfall alone; independent of the tier ladder.
static CROP_BRACKETS: [(f64, &[&str]); 3] = [
    (15.0, &["Dates", "Citrus", "Vegetables"]),
    (10.0, &["Dates", "Fodder Crops"]),
    (5.0, &["Dates", "Hardy Crops"]),
];
static DRY_CROPS: &[&str] = &["Desert Plants", "Drought-resistant"];

pub fn suitability_tier(rainfall_mm: f64, soil_moisture: f64) -> SuitabilityTier {
    tier_with_rule(rainfall_mm, soil_moisture)
        .map(|rule| rule.tier)
        .unwrap_or(SuitabilityTier::Poor)
}

fn tier_with_rule(rainfall_mm: f64, soil_moisture: f64) -> Option<&'static TierRule> {
    TIER_RULES.iter().find(|rule| {
        let rain = rainfall_mm > rule.rainfall_above;
        let soil = soil_moisture > rule.soil_above;
        if rule.require_both {
            rain && soil
        } else {
            rain || soil
        }
    })
}

pub fn recommended_crops(rainfall_mm: f64) -> Vec<String> {
    CROP_BRACKETS
        .iter()
        .find(|(threshold, _)| rainfall_mm > *threshold)
        .map(|(_, crops)| *crops)
        .unwrap_or(DRY_CROPS)
        .iter()
        .map(|crop| crop.to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgricultureAssessment {
    pub location_id: LocationId,
    pub location_name: String,
    pub rainfall_mm: f64,
    pub soil_moisture: f64,
    pub drainage_capacity: f64,
    pub tier: SuitabilityTier,
    pub recommended_crops: Vec<String>,
    pub high_priority: bool,
    pub rationale: Vec<String>,
}

pub fn assess_agriculture(site: &SiteConditions) -> AgricultureAssessment {
    let rainfall = site.rainfall();
    let soil = site.soil_moisture();
    let rule = tier_with_rule(rainfall, soil);
    let tier = rule.map(|rule| rule.tier).unwrap_or(SuitabilityTier::Poor);

    let mut rationale = Vec::new();
    match rule {
        Some(rule) if rule.require_both => rationale.push(format!(
            "{tier}: rainfall {rainfall}mm above {}mm and soil moisture {soil}% above {}%",
            rule.rainfall_above, rule.soil_above
        )),
        Some(rule) => {
            let mut drivers = Vec::new();
            if rainfall > rule.rainfall_above {
                drivers.push(format!("rainfall {rainfall}mm above {}mm", rule.rainfall_above));
            }
            if soil > rule.soil_above {
                drivers.push(format!("soil moisture {soil}% above {}%", rule.soil_above));
            }
            rationale.push(format!("{tier}: {}", drivers.join(" and ")));
        }
        None => rationale.push(format!(
            "{tier}: rainfall {rainfall}mm and soil moisture {soil}% below every tier threshold"
        )),
    }

    let high_priority = rainfall > PRIORITY_RAINFALL_MM;
    if high_priority {
        rationale.push("High priority: excellent water availability for agriculture".to_string());
    }

    AgricultureAssessment {
        location_id: site.location.id.clone(),
        location_name: site.location.name.clone(),
        rainfall_mm: rainfall,
        soil_moisture: soil,
        drainage_capacity: site.drainage(),
        tier,
        recommended_crops: recommended_crops(rainfall),
        high_priority,
        rationale,
    }
}

/// Assessments ordered by rainfall, wettest first; ties keep input order.
pub fn rank_agriculture(sites: &[SiteConditions]) -> Vec<AgricultureAssessment> {
    let mut ranked: Vec<AgricultureAssessment> = sites.iter().map(assess_agriculture).collect();
    ranked.sort_by(|a, b| b.rainfall_mm.total_cmp(&a.rainfall_mm));
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgricultureInsights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_location: Option<String>,
    pub top_rainfall_mm: f64,
    pub average_rainfall_mm: f64,
    pub average_soil_moisture: f64,
    pub average_temperature_c: f64,
    pub temperature_range_c: (f64, f64),
}

pub fn agriculture_insights(sites: &[SiteConditions]) -> AgricultureInsights {
    let mut best: Option<&SiteConditions> = None;
    for site in sites {
        if best.map_or(true, |current| site.rainfall() > current.rainfall()) {
            best = Some(site);
        }
    }

    let count = sites.len().max(1) as f64;
    let average = |value: fn(&SiteConditions) -> f64| {
        round_tenth(sites.iter().map(value).sum::<f64>() / count)
    };

    let temperatures = sites.iter().map(|site| site.snapshot.temperature_c);
    let min_temp = temperatures.clone().fold(f64::INFINITY, f64::min);
    let max_temp = temperatures.fold(f64::NEG_INFINITY, f64::max);
    let temperature_range_c = if sites.is_empty() {
        (0.0, 0.0)
    } else {
        (min_temp, max_temp)
    };

    AgricultureInsights {
        top_location: best.map(|site| site.location.name.clone()),
        top_rainfall_mm: best.map(SiteConditions::rainfall).unwrap_or(0.0),
        average_rainfall_mm: average(SiteConditions::rainfall),
        average_soil_moisture: average(SiteConditions::soil_moisture),
        average_temperature_c: average(|site| site.snapshot.temperature_c),
        temperature_range_c,
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
