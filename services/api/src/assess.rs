use crate::infra::{dashboard_service, ApiService};
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use uae_flood::config::AppConfig;
use uae_flood::dashboard::{
    DecisionMode, DecisionPath, DecisionRecord, DecisionReport, RainfallSimulation,
};
use uae_flood::error::AppError;

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct ScenarioOptions {
    /// Seed for generated weather (ignored when live weather is used)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Use generated weather even when an API key is configured
    #[arg(long)]
    pub(crate) demo: bool,
    /// Ask the remote decision service instead of the local decision tree
    #[arg(long)]
    pub(crate) remote: bool,
    /// Simulated rainfall in mm; only applies together with --remote
    #[arg(long)]
    pub(crate) simulate_rainfall: Option<f64>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    #[command(flatten)]
    pub(crate) options: ScenarioOptions,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Location id, e.g. abudhabi, dubai, sharjah, ajman, uaq, rak, fujairah
    pub(crate) location: String,
    #[command(flatten)]
    pub(crate) options: ScenarioOptions,
    /// Directory to write the decision report into
    #[arg(long)]
    pub(crate) report_dir: Option<PathBuf>,
}

pub(crate) async fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let service = prepare(args.options).await?;

    println!("UAE flood detection snapshot");
    render_overview(&service);
    render_agriculture(&service);
    render_hydropower(&service);
    render_notices(&service);

    Ok(())
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        location,
        options,
        report_dir,
    } = args;

    let service = prepare(options).await?;
    let record = service.analyze(&location).await?;

    print!("{}", format_decision(&record));
    render_notices(&service);

    if let Some(dir) = report_dir {
        let report = DecisionReport::render(&record, Utc::now());
        let path = dir.join(&report.file_name);
        std::fs::write(&path, report.body)?;
        println!("\nReport saved to {}", path.display());
    }

    Ok(())
}

async fn prepare(options: ScenarioOptions) -> Result<Arc<ApiService>, AppError> {
    let ScenarioOptions {
        seed,
        demo,
        remote,
        simulate_rainfall,
    } = options;

    let mut config = AppConfig::load()?;
    if seed.is_some() {
        config.weather.demo_seed = seed;
    }

    let service = dashboard_service(&config, demo)?;
    service.refresh_weather().await;

    if let Some(rainfall_mm) = simulate_rainfall {
        service.set_simulation(RainfallSimulation::enabled(rainfall_mm));
        if !remote {
            println!("note: simulated rainfall only applies to remote decisions");
        }
    }
    if remote {
        service.set_decision_mode(DecisionMode::Remote);
        service.refresh_remote_risk().await;
    }

    Ok(service)
}

fn render_overview(service: &ApiService) {
    let overview = service.overview();
    println!(
        "Data: {} | Decisions: {}",
        overview.mode.data_mode.label(),
        overview.mode.decision_mode.label()
    );
    if overview.mode.simulation.enabled {
        println!(
            "Simulated rainfall: {:.1}mm",
            overview.mode.simulation.rainfall_mm
        );
    }

    println!("\nFlood risk by location");
    for view in &overview.locations {
        let conditions = &view.conditions;
        println!(
            "- {}: {} ({}) | rain {:.1}mm | cloud {:.0}% {} | humidity {:.0}% | {:.0}°C",
            view.location.name,
            view.flood_risk.category.label().to_uppercase(),
            view.flood_risk.source.describe(),
            conditions.rainfall_mm,
            conditions.cloud_cover,
            conditions.cloud_category,
            conditions.humidity,
            conditions.temperature_c
        );
    }
}

fn render_agriculture(service: &ApiService) {
    let agriculture = service.agriculture();

    println!("\nAgriculture suitability");
    for (rank, entry) in agriculture.ranking.iter().enumerate() {
        let marker = if entry.high_priority { " *" } else { "" };
        println!(
            "{}. {}{}: {} | rain {:.1}mm | soil {:.0}% | crops: {}",
            rank + 1,
            entry.location_name,
            marker,
            entry.tier.label(),
            entry.rainfall_mm,
            entry.soil_moisture,
            entry.recommended_crops.join(", ")
        );
    }

    let insights = &agriculture.insights;
    if let Some(top) = &insights.top_location {
        println!("Best conditions: {} ({:.1}mm)", top, insights.top_rainfall_mm);
    }
    println!(
        "Averages: rain {:.1}mm | soil {:.1}% | temperature {:.1}°C ({:.0}-{:.0}°C)",
        insights.average_rainfall_mm,
        insights.average_soil_moisture,
        insights.average_temperature_c,
        insights.temperature_range_c.0,
        insights.temperature_range_c.1
    );
}

fn render_hydropower(service: &ApiService) {
    let hydropower = service.hydropower();

    println!("\nHydropower potential");
    for (rank, entry) in hydropower.ranking.iter().enumerate() {
        println!(
            "{}. {}: {} ({:.1}) | {} kW | {}",
            rank + 1,
            entry.location_name,
            entry.tier.label(),
            entry.score,
            entry.estimated_capacity_kw,
            entry.plant_type.label()
        );
    }

    let insights = &hydropower.insights;
    println!(
        "Combined capacity {} kW | ~{} homes | {} t CO2 avoided per year",
        insights.combined_capacity_kw,
        insights.homes_powered,
        insights.co2_reduction_tonnes_per_year
    );
}

fn render_notices(service: &ApiService) {
    let notices = service.notices();
    if notices.is_empty() {
        return;
    }

    println!("\nNotices");
    for notice in notices {
        println!(
            "- [{}] {}",
            notice.timestamp.format("%H:%M:%S"),
            notice.message
        );
    }
}

fn format_decision(record: &DecisionRecord) -> String {
    let decided_by = match record.path {
        DecisionPath::Local => "local decision tree",
        DecisionPath::Remote => "remote decision service",
    };

    let mut out = format!(
        "Seeding decision for {}\n- {} ({}% confidence, {})\n- Flood risk {} ({})\n",
        record.location_name,
        record.decision,
        record.confidence,
        decided_by,
        record.flood_risk.category.label().to_uppercase(),
        record.flood_risk.source.describe()
    );
    out.push_str(&format!(
        "- Rainfall {:.1}mm now, {:.1}mm potential\n",
        record.conditions.rainfall_mm, record.total_potential_rain_mm
    ));
    for reason in &record.rationale {
        out.push_str(&format!("  - {reason}\n"));
    }
    out.push_str(&record.recommendation);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use uae_flood::engine::{
        find_location, CloudCategory, RiskCategory, ScoringEngine, SiteConditions,
        WeatherSnapshot,
    };

    #[test]
    fn decision_summary_names_path_and_risk() {
        let location = find_location("abudhabi").expect("known location").clone();
        let site = SiteConditions::new(
            location,
            WeatherSnapshot {
                cloud_cover: 60.0,
                cloud_category: CloudCategory::Cumulus,
                rainfall_mm: 30.0,
                humidity: 70.0,
                ..WeatherSnapshot::fallback()
            },
        );
        let engine = ScoringEngine::new();
        let flood = engine.flood(&site);
        let analysis = engine.seeding(&site);
        let record = DecisionRecord::local(&site, &analysis, flood.risk(), Utc::now());

        let summary = format_decision(&record);

        assert_eq!(record.flood_risk.category, RiskCategory::High);
        assert!(summary.contains("Seeding decision for Abu Dhabi"));
        assert!(summary.contains("FLOOD_WARNING (92% confidence, local decision tree)"));
        assert!(summary.contains("Flood risk HIGH"));
    }
}
