use super::common::*;
use crate::engine::{
    hydropower_insights, hydropower_tier, rank_hydropower, water_flow_score, HydropowerTier,
    PlantType,
};

#[test]
fn wet_runoff_site_has_excellent_potential() {
    let site = land_site("abudhabi", 18.0, 45.0, 75.0);

    let outcome = engine().hydropower(&site);

    assert_close(outcome.score, 46.2);
    assert_eq!(outcome.tier, HydropowerTier::Excellent);
    assert_eq!(outcome.estimated_capacity_kw, 92);
    assert_eq!(outcome.plant_type, PlantType::RunOfRiverWithStorage);
    assert_eq!(outcome.water_flow_pct, 55.0);
    assert!(outcome.priority_site);
    assert_eq!(
        outcome.benefits,
        vec!["High ROI", "Consistent Flow", "Natural Channels", "Water Storage"]
    );
}

#[test]
fn tier_requires_both_signals_only_at_the_top() {
    assert_eq!(hydropower_tier(35.0, 15.0), HydropowerTier::Good);
    assert_eq!(hydropower_tier(5.0, 11.0), HydropowerTier::Good);
    assert_eq!(hydropower_tier(10.5, 0.0), HydropowerTier::Moderate);
    assert_eq!(hydropower_tier(10.0, 5.0), HydropowerTier::Low);
}

#[test]
fn plant_ladder_follows_score_alone() {
    // Score 35 with light rain: Good tier but the storage plant still applies.
    let score = 35.0;
    assert_eq!(hydropower_tier(score, 2.0), HydropowerTier::Good);
    assert_eq!(PlantType::for_score(score), PlantType::RunOfRiverWithStorage);
    assert_eq!(PlantType::for_score(30.0), PlantType::RunOfRiver);
    assert_eq!(PlantType::for_score(20.0), PlantType::MicroHydro);
    assert_eq!(PlantType::for_score(10.0), PlantType::PicoHydro);
}

#[test]
fn dry_well_drained_site_is_low_with_no_benefits() {
    let site = land_site("ajman", 0.0, 90.0, 25.0);

    let outcome = engine().hydropower(&site);

    assert_close(outcome.score, water_flow_score(0.0, 90.0, 25.0));
    assert_close(outcome.score, 10.5);
    assert_eq!(outcome.tier, HydropowerTier::Moderate);
    assert_eq!(outcome.plant_type, PlantType::MicroHydro);
    assert!(outcome.benefits.is_empty());
    assert!(!outcome.priority_site);
}

#[test]
fn ranking_orders_by_score() {
    let sites = vec![
        land_site("low", 0.0, 90.0, 25.0),
        land_site("high", 18.0, 45.0, 75.0),
        land_site("mid", 5.0, 70.0, 45.0),
    ];

    let ranked = rank_hydropower(&sites);

    let ids: Vec<&str> = ranked.iter().map(|a| a.location_id.as_str()).collect();
    assert_eq!(ids, vec!["high", "mid", "low"]);
}

#[test]
fn insights_total_capacity_across_sites() {
    let sites = vec![
        land_site("high", 18.0, 45.0, 75.0),
        land_site("low", 0.0, 90.0, 25.0),
    ];

    let insights = hydropower_insights(&sites);

    // (46.2 + 10.5) * 2 = 113.4
    assert_eq!(insights.top_location.as_deref(), Some("HIGH"));
    assert_eq!(insights.combined_capacity_kw, 113);
    assert_eq!(insights.homes_powered, 23);
    assert_eq!(insights.co2_reduction_tonnes_per_year, 91);
}
