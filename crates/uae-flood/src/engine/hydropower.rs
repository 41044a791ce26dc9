use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::{LocationId, SiteConditions};

pub const RAINFALL_FLOW_WEIGHT: f64 = 0.4;
pub const RUNOFF_FLOW_WEIGHT: f64 = 0.3;
pub const SOIL_FLOW_WEIGHT: f64 = 0.3;
pub const KW_PER_SCORE_POINT: f64 = 2.0;
pub const PRIORITY_SITE_SCORE: f64 = 25.0;
pub const KW_PER_HOUSEHOLD: f64 = 5.0;
pub const CO2_TONNES_PER_KW_YEAR: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HydropowerTier {
    Low,
    Moderate,
    Good,
    Excellent,
}

impl HydropowerTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for HydropowerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantType {
    RunOfRiverWithStorage,
    RunOfRiver,
    MicroHydro,
    PicoHydro,
}

impl PlantType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RunOfRiverWithStorage => "Run-of-River with Storage",
            Self::RunOfRiver => "Run-of-River",
            Self::MicroHydro => "Micro-Hydro",
            Self::PicoHydro => "Pico-Hydro",
        }
    }

    /// Threshold ladder on score alone, independent of the tier rules.
    pub fn for_score(score: f64) -> Self {
        if score > 30.0 {
            Self::RunOfRiverWithStorage
        } else if score > 20.0 {
            Self::RunOfRiver
        } else if score > 10.0 {
            Self::MicroHydro
        } else {
            Self::PicoHydro
        }
    }
}

impl fmt::Display for PlantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn water_flow_score(rainfall_mm: f64, drainage_capacity: f64, soil_moisture: f64) -> f64 {
    rainfall_mm * RAINFALL_FLOW_WEIGHT
        + (100.0 - drainage_capacity) * RUNOFF_FLOW_WEIGHT
        + soil_moisture * SOIL_FLOW_WEIGHT
}

pub fn hydropower_tier(score: f64, rainfall_mm: f64) -> HydropowerTier {
    if score > 30.0 && rainfall_mm > 15.0 {
        HydropowerTier::Excellent
    } else if score > 20.0 || rainfall_mm > 10.0 {
        HydropowerTier::Good
    } else if score > 10.0 || rainfall_mm > 5.0 {
        HydropowerTier::Moderate
    } else {
        HydropowerTier::Low
    }
}

pub fn estimated_capacity_kw(score: f64) -> u32 {
    (score * KW_PER_SCORE_POINT).round().max(0.0) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydropowerAssessment {
    pub location_id: LocationId,
    pub location_name: String,
    pub rainfall_mm: f64,
    /// 100 - drainage capacity; share of water left to run off.
    pub water_flow_pct: f64,
    pub soil_moisture: f64,
    pub score: f64,
    pub tier: HydropowerTier,
    pub estimated_capacity_kw: u32,
    pub plant_type: PlantType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,
    pub priority_site: bool,
    pub rationale: Vec<String>,
}

pub fn assess_hydropower(site: &SiteConditions) -> HydropowerAssessment {
    let rainfall = site.rainfall();
    let drainage = site.drainage();
    let soil = site.soil_moisture();
    let score = water_flow_score(rainfall, drainage, soil);
    let tier = hydropower_tier(score, rainfall);
    let plant_type = PlantType::for_score(score);

    let mut benefits = Vec::new();
    if score > 20.0 {
        benefits.push("High ROI".to_string());
    }
    if rainfall > 10.0 {
        benefits.push("Consistent Flow".to_string());
    }
    if drainage < 70.0 {
        benefits.push("Natural Channels".to_string());
    }
    if soil > 40.0 {
        benefits.push("Water Storage".to_string());
    }

    let priority_site = score > PRIORITY_SITE_SCORE;
    let mut rationale = vec![
        format!(
            "water flow score {score:.1} = rainfall {rainfall}mm x {RAINFALL_FLOW_WEIGHT} + runoff {}% x {RUNOFF_FLOW_WEIGHT} + soil moisture {soil}% x {SOIL_FLOW_WEIGHT}",
            100.0 - drainage
        ),
        format!("{tier} potential with {} recommended", plant_type.label()),
    ];
    if priority_site {
        rationale.push(
            "Priority site: excellent hydropower potential, recommended for immediate development"
                .to_string(),
        );
    }

    HydropowerAssessment {
        location_id: site.location.id.clone(),
        location_name: site.location.name.clone(),
        rainfall_mm: rainfall,
        water_flow_pct: 100.0 - drainage,
        soil_moisture: soil,
        score,
        tier,
        estimated_capacity_kw: estimated_capacity_kw(score),
        plant_type,
        benefits,
        priority_site,
        rationale,
    }
}

/// Assessments ordered by water flow score, highest first; ties keep input order.
pub fn rank_hydropower(sites: &[SiteConditions]) -> Vec<HydropowerAssessment> {
    let mut ranked: Vec<HydropowerAssessment> = sites.iter().map(assess_hydropower).collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydropowerInsights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_location: Option<String>,
    pub combined_capacity_kw: u32,
    pub homes_powered: u32,
    pub co2_reduction_tonnes_per_year: u32,
}

pub fn hydropower_insights(sites: &[SiteConditions]) -> HydropowerInsights {
    let mut best: Option<(&SiteConditions, f64)> = None;
    let mut total_kw = 0.0;

    for site in sites {
        let score = water_flow_score(site.rainfall(), site.drainage(), site.soil_moisture());
        total_kw += score * KW_PER_SCORE_POINT;
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((site, score));
        }
    }

    let whole = |value: f64| value.round().max(0.0) as u32;

    HydropowerInsights {
        top_location: best.map(|(site, _)| site.location.name.clone()),
        combined_capacity_kw: whole(total_kw),
        homes_powered: whole(total_kw / KW_PER_HOUSEHOLD),
        co2_reduction_tonnes_per_year: whole(total_kw * CO2_TONNES_PER_KW_YEAR),
    }
}
