use crate::engine::domain::{CloudCategory, Location, SiteConditions, WeatherSnapshot};
use crate::engine::ScoringEngine;

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new()
}

pub(super) fn location(drainage_capacity: f64, soil_moisture: f64) -> Location {
    Location::new(
        "test-site",
        "Test Site",
        25.0,
        55.0,
        drainage_capacity,
        soil_moisture,
    )
}

pub(super) fn snapshot(
    rainfall_mm: f64,
    cloud_cover: f64,
    humidity: f64,
    cloud_category: CloudCategory,
) -> WeatherSnapshot {
    WeatherSnapshot {
        cloud_cover,
        cloud_category,
        rainfall_mm,
        humidity,
        wind_speed: Some(4.0),
        temperature_c: 30.0,
        pressure_hpa: Some(1009.0),
    }
}

/// Site with the weather fields that drive flood scoring.
pub(super) fn flood_site(
    rainfall_mm: f64,
    cloud_cover: f64,
    humidity: f64,
    drainage_capacity: f64,
) -> SiteConditions {
    SiteConditions::new(
        location(drainage_capacity, 40.0),
        snapshot(rainfall_mm, cloud_cover, humidity, CloudCategory::Cumulus),
    )
}

pub(super) fn seeding_site(
    cloud_cover: f64,
    humidity: f64,
    cloud_category: CloudCategory,
    rainfall_mm: f64,
    drainage_capacity: f64,
) -> SiteConditions {
    SiteConditions::new(
        location(drainage_capacity, 40.0),
        snapshot(rainfall_mm, cloud_cover, humidity, cloud_category),
    )
}

pub(super) fn land_site(
    id: &str,
    rainfall_mm: f64,
    drainage_capacity: f64,
    soil_moisture: f64,
) -> SiteConditions {
    let mut location = location(drainage_capacity, soil_moisture);
    location.id.0 = id.to_string();
    location.name = id.to_uppercase();
    SiteConditions::new(
        location,
        snapshot(rainfall_mm, 40.0, 55.0, CloudCategory::Stratus),
    )
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
