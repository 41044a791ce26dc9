use serde::{Deserialize, Serialize};

use super::domain::{RiskCategory, SiteConditions};

pub const RAINFALL_WEIGHT: f64 = 3.0;
pub const CLOUD_COVER_WEIGHT: f64 = 0.3;
pub const HUMIDITY_WEIGHT: f64 = 0.2;
pub const DRAINAGE_WEIGHT: f64 = 0.5;

/// Weighted-score thresholds; both strict.
pub const LOCAL_HIGH_SCORE: f64 = 40.0;
pub const LOCAL_MEDIUM_SCORE: f64 = 20.0;

/// Remote flood-probability thresholds (percent); both inclusive.
pub const REMOTE_HIGH_PROBABILITY: f64 = 70.0;
pub const REMOTE_MEDIUM_PROBABILITY: f64 = 50.0;

/// Inputs to the weighted flood score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloodInputs {
    pub rainfall_mm: f64,
    pub cloud_cover: f64,
    pub humidity: f64,
    pub drainage_capacity: f64,
}

impl From<&SiteConditions> for FloodInputs {
    fn from(site: &SiteConditions) -> Self {
        Self {
            rainfall_mm: site.snapshot.rainfall_mm,
            cloud_cover: site.snapshot.cloud_cover,
            humidity: site.snapshot.humidity,
            drainage_capacity: site.location.drainage_capacity,
        }
    }
}

pub fn flood_risk_score(inputs: &FloodInputs) -> f64 {
    inputs.rainfall_mm * RAINFALL_WEIGHT + inputs.cloud_cover * CLOUD_COVER_WEIGHT
        + inputs.humidity * HUMIDITY_WEIGHT
        - inputs.drainage_capacity * DRAINAGE_WEIGHT
}

/// Which computation produced a risk label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskSource {
    /// Local weighted score.
    Local { score: f64 },
    /// Flood probability (0-100) returned by the decision backend.
    Remote { probability: f64 },
}

struct RiskBand {
    high: f64,
    medium: f64,
    inclusive: bool,
}

impl RiskBand {
    fn classify(&self, value: f64) -> RiskCategory {
        let reaches = |threshold: f64| {
            if self.inclusive {
                value >= threshold
            } else {
                value > threshold
            }
        };

        if reaches(self.high) {
            RiskCategory::High
        } else if reaches(self.medium) {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }
}

const LOCAL_BAND: RiskBand = RiskBand {
    high: LOCAL_HIGH_SCORE,
    medium: LOCAL_MEDIUM_SCORE,
    inclusive: false,
};

const REMOTE_BAND: RiskBand = RiskBand {
    high: REMOTE_HIGH_PROBABILITY,
    medium: REMOTE_MEDIUM_PROBABILITY,
    inclusive: true,
};

impl RiskSource {
    pub fn category(&self) -> RiskCategory {
        match *self {
            RiskSource::Local { score } => LOCAL_BAND.classify(score),
            RiskSource::Remote { probability } => REMOTE_BAND.classify(probability),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, RiskSource::Remote { .. })
    }

    pub fn describe(&self) -> String {
        match self {
            RiskSource::Local { score } => format!("local weighted score {score:.1}"),
            RiskSource::Remote { probability } => {
                format!("remote flood probability {probability:.1}%")
            }
        }
    }
}

/// A risk label together with the source that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub category: RiskCategory,
    pub source: RiskSource,
}

impl RiskAssessment {
    pub fn from_source(source: RiskSource) -> Self {
        Self {
            category: source.category(),
            source,
        }
    }

    pub fn local(score: f64) -> Self {
        Self::from_source(RiskSource::Local { score })
    }

    pub fn remote(probability: f64) -> Self {
        Self::from_source(RiskSource::Remote { probability })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloodFactor {
    Rainfall,
    CloudCover,
    Humidity,
    Drainage,
}

/// Signed contribution of one input to the flood score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodComponent {
    pub factor: FloodFactor,
    pub contribution: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodAssessment {
    pub score: f64,
    pub category: RiskCategory,
    pub components: Vec<FloodComponent>,
    pub rationale: Vec<String>,
}

impl FloodAssessment {
    pub fn risk(&self) -> RiskAssessment {
        RiskAssessment::local(self.score)
    }
}

pub fn assess_flood(inputs: &FloodInputs) -> FloodAssessment {
    let components = vec![
        FloodComponent {
            factor: FloodFactor::Rainfall,
            contribution: inputs.rainfall_mm * RAINFALL_WEIGHT,
            notes: format!(
                "rainfall {}mm x {RAINFALL_WEIGHT} = {:+.1}",
                inputs.rainfall_mm,
                inputs.rainfall_mm * RAINFALL_WEIGHT
            ),
        },
        FloodComponent {
            factor: FloodFactor::CloudCover,
            contribution: inputs.cloud_cover * CLOUD_COVER_WEIGHT,
            notes: format!(
                "cloud cover {}% x {CLOUD_COVER_WEIGHT} = {:+.1}",
                inputs.cloud_cover,
                inputs.cloud_cover * CLOUD_COVER_WEIGHT
            ),
        },
        FloodComponent {
            factor: FloodFactor::Humidity,
            contribution: inputs.humidity * HUMIDITY_WEIGHT,
            notes: format!(
                "humidity {}% x {HUMIDITY_WEIGHT} = {:+.1}",
                inputs.humidity,
                inputs.humidity * HUMIDITY_WEIGHT
            ),
        },
        FloodComponent {
            factor: FloodFactor::Drainage,
            contribution: -inputs.drainage_capacity * DRAINAGE_WEIGHT,
            notes: format!(
                "drainage capacity {}% x -{DRAINAGE_WEIGHT} = {:+.1}",
                inputs.drainage_capacity,
                -inputs.drainage_capacity * DRAINAGE_WEIGHT
            ),
        },
    ];

    let score = flood_risk_score(inputs);
    let category = LOCAL_BAND.classify(score);

    let verdict = match category {
        RiskCategory::High => format!("score {score:.1} exceeds high threshold {LOCAL_HIGH_SCORE}"),
        RiskCategory::Medium => format!(
            "score {score:.1} exceeds medium threshold {LOCAL_MEDIUM_SCORE} but not {LOCAL_HIGH_SCORE}"
        ),
        RiskCategory::Low => {
            format!("score {score:.1} at or below medium threshold {LOCAL_MEDIUM_SCORE}")
        }
    };

    let mut rationale: Vec<String> = components
        .iter()
        .map(|component| component.notes.clone())
        .collect();
    rationale.push(verdict);

    FloodAssessment {
        score,
        category,
        components,
        rationale,
    }
}
