use uae_flood::engine::{
    find_location, CloudCategory, HydropowerTier, PlantType, RiskCategory, ScoringEngine,
    SeedingDecision, SiteConditions, SuitabilityTier, WeatherSnapshot,
};

fn site(id: &str, snapshot: WeatherSnapshot) -> SiteConditions {
    let location = find_location(id).expect("known emirate").clone();
    SiteConditions::new(location, snapshot)
}

fn storm() -> WeatherSnapshot {
    WeatherSnapshot {
        cloud_cover: 60.0,
        cloud_category: CloudCategory::Cumulus,
        rainfall_mm: 30.0,
        humidity: 70.0,
        wind_speed: Some(9.0),
        temperature_c: 27.0,
        pressure_hpa: Some(1004.0),
    }
}

#[test]
fn wet_seedable_day_in_abu_dhabi_cancels_seeding() {
    let engine = ScoringEngine::new();
    let assessment = engine.assess(&site("abudhabi", storm()));

    assert_eq!(assessment.flood.category, RiskCategory::High);
    assert_eq!(assessment.seeding.decision, SeedingDecision::FloodWarning);
    assert_eq!(assessment.seeding.confidence, 92);
    assert!(assessment.seeding.eligible);
    assert_eq!(assessment.seeding.total_potential_rain_mm, 48.0);
    assert_eq!(
        assessment.seeding.rationale.first().map(String::as_str),
        Some("Flood risk is already high")
    );
}

#[test]
fn stratus_cover_is_never_seeded_whatever_the_rest_says() {
    let engine = ScoringEngine::new();
    let snapshot = WeatherSnapshot {
        cloud_category: CloudCategory::Stratus,
        rainfall_mm: 0.0,
        ..storm()
    };

    let analysis = engine.seeding(&site("fujairah", snapshot));

    assert_eq!(analysis.decision, SeedingDecision::NotSeedable);
    assert!(!analysis.eligible);
    assert_eq!(analysis.predicted_additional_rain_mm, 0.0);
}

#[test]
fn heavy_rain_ranks_high_for_farming_and_power() {
    let engine = ScoringEngine::new();
    let wet = site("abudhabi", storm());

    let agriculture = engine.agriculture(&wet);
    let hydropower = engine.hydropower(&wet);

    assert_eq!(agriculture.tier, SuitabilityTier::Excellent);
    assert!(agriculture.high_priority);
    assert!(!agriculture.recommended_crops.is_empty());
    assert!(hydropower.score > 0.0);
    assert!(matches!(
        hydropower.tier,
        HydropowerTier::Good | HydropowerTier::Excellent
    ));
    assert_ne!(hydropower.plant_type, PlantType::PicoHydro);
}
