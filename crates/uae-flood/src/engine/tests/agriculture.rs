use super::common::*;
use crate::engine::{
    agriculture_insights, rank_agriculture, recommended_crops, suitability_tier, SuitabilityTier,
};

#[test]
fn wet_site_with_moist_soil_is_excellent() {
    let site = land_site("wadi", 16.0, 60.0, 45.0);

    let outcome = engine().agriculture(&site);

    assert_eq!(outcome.tier, SuitabilityTier::Excellent);
    assert_eq!(outcome.recommended_crops, vec!["Dates", "Citrus", "Vegetables"]);
    assert!(outcome.high_priority);
}

#[test]
fn tier_ladder_uses_compound_conditions() {
    assert_eq!(suitability_tier(16.0, 40.0), SuitabilityTier::Good);
    assert_eq!(suitability_tier(2.0, 31.0), SuitabilityTier::Good);
    assert_eq!(suitability_tier(6.0, 10.0), SuitabilityTier::Moderate);
    assert_eq!(suitability_tier(0.0, 21.0), SuitabilityTier::Moderate);
    assert_eq!(suitability_tier(5.0, 20.0), SuitabilityTier::Poor);
}

#[test]
fn crop_ladder_is_independent_of_tier() {
    // Good tier through soil moisture alone, but crops follow rainfall only.
    let site = land_site("oasis", 2.0, 60.0, 75.0);
    let outcome = engine().agriculture(&site);

    assert_eq!(outcome.tier, SuitabilityTier::Good);
    assert_eq!(
        outcome.recommended_crops,
        vec!["Desert Plants", "Drought-resistant"]
    );
    assert!(!outcome.high_priority);

    assert_eq!(recommended_crops(15.0), vec!["Dates", "Fodder Crops"]);
    assert_eq!(recommended_crops(10.0), vec!["Dates", "Hardy Crops"]);
}

#[test]
fn ranking_orders_by_rainfall_and_keeps_ties_stable() {
    let sites = vec![
        land_site("a", 4.0, 80.0, 30.0),
        land_site("b", 12.0, 80.0, 30.0),
        land_site("c", 4.0, 80.0, 30.0),
        land_site("d", 20.0, 80.0, 30.0),
    ];

    let ranked = rank_agriculture(&sites);

    let ids: Vec<&str> = ranked.iter().map(|a| a.location_id.as_str()).collect();
    assert_eq!(ids, vec!["d", "b", "a", "c"]);
}

#[test]
fn insights_pick_first_wettest_and_round_averages() {
    let mut sites = vec![
        land_site("a", 12.0, 80.0, 30.0),
        land_site("b", 12.0, 80.0, 31.0),
        land_site("c", 3.0, 80.0, 40.0),
    ];
    sites[0].snapshot.temperature_c = 31.0;
    sites[1].snapshot.temperature_c = 27.0;
    sites[2].snapshot.temperature_c = 35.0;

    let insights = agriculture_insights(&sites);

    assert_eq!(insights.top_location.as_deref(), Some("A"));
    assert_eq!(insights.top_rainfall_mm, 12.0);
    assert_eq!(insights.average_rainfall_mm, 9.0);
    assert_eq!(insights.average_soil_moisture, 33.7);
    assert_eq!(insights.average_temperature_c, 31.0);
    assert_eq!(insights.temperature_range_c, (27.0, 35.0));
}

#[test]
fn insights_on_empty_input_are_zeroed() {
    let insights = agriculture_insights(&[]);

    assert!(insights.top_location.is_none());
    assert_eq!(insights.average_rainfall_mm, 0.0);
    assert_eq!(insights.temperature_range_c, (0.0, 0.0));
}
