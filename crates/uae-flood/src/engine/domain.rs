use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Identifier wrapper for the reference locations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(pub String);

impl LocationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Static reference data for a monitored emirate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub coordinates: GeoPoint,
    /// 0-100, higher drains better.
    pub drainage_capacity: f64,
    /// Baseline soil moisture, 0-100.
    pub soil_moisture: f64,
}

impl Location {
    pub fn new(
        id: &str,
        name: &str,
        lat: f64,
        lng: f64,
        drainage_capacity: f64,
        soil_moisture: f64,
    ) -> Self {
        Self {
            id: LocationId(id.to_string()),
            name: name.to_string(),
            coordinates: GeoPoint { lat, lng },
            drainage_capacity,
            soil_moisture,
        }
    }
}

/// The seven emirates, built once and shared for the life of the process.
pub fn emirates() -> &'static [Location] {
    static EMIRATES: OnceLock<Vec<Location>> = OnceLock::new();
    EMIRATES.get_or_init(|| {
        vec![
            Location::new("dubai", "Dubai", 25.2048, 55.2708, 85.0, 35.0),
            Location::new("abudhabi", "Abu Dhabi", 24.4539, 54.3773, 45.0, 75.0),
            Location::new("sharjah", "Sharjah", 25.3463, 55.4209, 80.0, 30.0),
            Location::new("ajman", "Ajman", 25.4052, 55.5136, 90.0, 25.0),
            Location::new("rak", "Ras Al Khaimah", 25.7896, 55.9433, 65.0, 55.0),
            Location::new("fujairah", "Fujairah", 25.1288, 56.3265, 70.0, 45.0),
            Location::new("uaq", "Umm Al Quwain", 25.5647, 55.5552, 85.0, 32.0),
        ]
    })
}

pub fn find_location(id: &str) -> Option<&'static Location> {
    emirates().iter().find(|location| location.id.as_str() == id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloudCategory {
    Clear,
    Cumulus,
    Nimbostratus,
    Cumulonimbus,
    Stratus,
}

impl CloudCategory {
    pub const fn all() -> [Self; 5] {
        [
            Self::Clear,
            Self::Cumulus,
            Self::Nimbostratus,
            Self::Cumulonimbus,
            Self::Stratus,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Cumulus => "Cumulus",
            Self::Nimbostratus => "Nimbostratus",
            Self::Cumulonimbus => "Cumulonimbus",
            Self::Stratus => "Stratus",
        }
    }

    /// Only convective clouds respond to seeding.
    pub const fn is_seedable(self) -> bool {
        matches!(self, Self::Cumulus | Self::Cumulonimbus)
    }

    /// Maps a free-text provider description ("light rain", "scattered clouds") to a category.
    pub fn from_description(description: &str) -> Self {
        let description = description.to_ascii_lowercase();
        if description.contains("thunder") {
            Self::Cumulonimbus
        } else if description.contains("rain") || description.contains("drizzle") {
            Self::Nimbostratus
        } else if description.contains("cloud") {
            Self::Cumulus
        } else if description.contains("clear") {
            Self::Clear
        } else {
            Self::Stratus
        }
    }
}

impl fmt::Display for CloudCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Point-in-time readings for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub cloud_cover: f64,
    pub cloud_category: CloudCategory,
    pub rainfall_mm: f64,
    pub humidity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    pub temperature_c: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_hpa: Option<f64>,
}

impl WeatherSnapshot {
    /// Substituted for a location whose provider call failed.
    pub fn fallback() -> Self {
        Self {
            cloud_cover: 50.0,
            cloud_category: CloudCategory::Cumulus,
            rainfall_mm: 0.0,
            humidity: 60.0,
            wind_speed: Some(10.0),
            temperature_c: 28.0,
            pressure_hpa: Some(1013.0),
        }
    }

    /// Placeholder shown before the first refresh completes.
    pub fn pending() -> Self {
        Self {
            cloud_cover: 0.0,
            cloud_category: CloudCategory::Clear,
            rainfall_mm: 0.0,
            humidity: 0.0,
            wind_speed: None,
            temperature_c: 0.0,
            pressure_hpa: None,
        }
    }

    /// Copy of the snapshot with rainfall replaced.
    pub fn with_rainfall(&self, rainfall_mm: f64) -> Self {
        Self {
            rainfall_mm,
            ..self.clone()
        }
    }

    /// Pulls out-of-range upstream values back into their documented ranges.
    pub fn clamped(self) -> Self {
        Self {
            cloud_cover: clamp_percent(self.cloud_cover),
            rainfall_mm: non_negative(self.rainfall_mm),
            humidity: clamp_percent(self.humidity),
            wind_speed: self.wind_speed.map(non_negative),
            ..self
        }
    }

    pub fn wind_speed_display(&self) -> f64 {
        self.wind_speed.unwrap_or(0.0)
    }

    pub fn pressure_display(&self) -> f64 {
        self.pressure_hpa.unwrap_or(0.0)
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// A location joined with the snapshot being scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConditions {
    pub location: Location,
    pub snapshot: WeatherSnapshot,
}

impl SiteConditions {
    pub fn new(location: Location, snapshot: WeatherSnapshot) -> Self {
        Self { location, snapshot }
    }

    pub fn name(&self) -> &str {
        &self.location.name
    }

    pub fn rainfall(&self) -> f64 {
        self.snapshot.rainfall_mm
    }

    pub fn drainage(&self) -> f64 {
        self.location.drainage_capacity
    }

    pub fn soil_moisture(&self) -> f64 {
        self.location.soil_moisture
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_set_has_seven_unique_emirates() {
        let locations = emirates();
        assert_eq!(locations.len(), 7);
        let mut ids: Vec<&str> = locations.iter().map(|l| l.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 7);
        assert_eq!(
            find_location("abudhabi").map(|l| l.drainage_capacity),
            Some(45.0)
        );
    }

    #[test]
    fn cloud_category_follows_description_priority() {
        assert_eq!(
            CloudCategory::from_description("thunderstorm with light rain"),
            CloudCategory::Cumulonimbus
        );
        assert_eq!(
            CloudCategory::from_description("light intensity drizzle"),
            CloudCategory::Nimbostratus
        );
        assert_eq!(
            CloudCategory::from_description("scattered clouds"),
            CloudCategory::Cumulus
        );
        assert_eq!(
            CloudCategory::from_description("clear sky"),
            CloudCategory::Clear
        );
        assert_eq!(CloudCategory::from_description("haze"), CloudCategory::Stratus);
    }

    #[test]
    fn clamped_snapshot_stays_in_range() {
        let snapshot = WeatherSnapshot {
            cloud_cover: 140.0,
            rainfall_mm: -3.0,
            humidity: f64::NAN,
            wind_speed: Some(-1.0),
            ..WeatherSnapshot::fallback()
        }
        .clamped();

        assert_eq!(snapshot.cloud_cover, 100.0);
        assert_eq!(snapshot.rainfall_mm, 0.0);
        assert_eq!(snapshot.humidity, 0.0);
        assert_eq!(snapshot.wind_speed, Some(0.0));
    }

    #[test]
    fn with_rainfall_leaves_original_untouched() {
        let original = WeatherSnapshot::fallback();
        let simulated = original.with_rainfall(25.0);
        assert_eq!(original.rainfall_mm, 0.0);
        assert_eq!(simulated.rainfall_mm, 25.0);
        assert_eq!(simulated.cloud_cover, original.cloud_cover);
    }
}
