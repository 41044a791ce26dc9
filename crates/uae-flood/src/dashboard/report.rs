//! Plain-text export of the latest decision.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::record::{DecisionPath, DecisionRecord};

const RULE: &str = "=================================================";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionReport {
    pub file_name: String,
    pub body: String,
}

impl DecisionReport {
    pub fn render(record: &DecisionRecord, generated_at: DateTime<Utc>) -> Self {
        Self {
            file_name: report_file_name(record, generated_at),
            body: render_report(record, generated_at),
        }
    }
}

pub fn report_file_name(record: &DecisionRecord, generated_at: DateTime<Utc>) -> String {
    format!(
        "flood-analysis-{}-{}.txt",
        record.location_id,
        generated_at.timestamp_millis()
    )
}

pub fn render_report(record: &DecisionRecord, generated_at: DateTime<Utc>) -> String {
    let conditions = &record.conditions;
    let path = match record.path {
        DecisionPath::Local => "local decision tree",
        DecisionPath::Remote => "remote decision service",
    };

    let mut lines = vec![
        "UAE FLOOD DETECTION & CLOUD SEEDING SYSTEM".to_string(),
        "Decision Analysis Report".to_string(),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        RULE.to_string(),
        String::new(),
        format!("LOCATION: {}", record.location_name),
        format!("DECISION: {}", record.decision),
        format!("CONFIDENCE: {}%", record.confidence),
        format!("DECIDED BY: {path}"),
        String::new(),
        "ATMOSPHERIC CONDITIONS:".to_string(),
        format!("- Cloud Type: {}", conditions.cloud_category),
        format!("- Cloud Cover: {}%", conditions.cloud_cover),
        format!("- Humidity: {}%", conditions.humidity),
        format!("- Wind Speed: {} m/s", conditions.wind_speed_display()),
        format!("- Pressure: {} hPa", conditions.pressure_display()),
        format!("- Current Rainfall: {}mm", conditions.rainfall_mm),
        format!(
            "- Predicted Additional Rain: {}mm",
            record.predicted_additional_rain_mm
        ),
        format!(
            "- Total Potential Rainfall: {}mm",
            record.total_potential_rain_mm
        ),
        String::new(),
        "FLOOD RISK ASSESSMENT:".to_string(),
        format!(
            "- Risk Level: {}",
            record.flood_risk.category.label().to_uppercase()
        ),
        format!("- Risk Source: {}", record.flood_risk.source.describe()),
        format!("- Soil Moisture: {}%", record.soil_moisture),
        format!("- Drainage Capacity: {}%", record.drainage_capacity),
        String::new(),
        "REASONING:".to_string(),
    ];
    lines.extend(
        record
            .rationale
            .iter()
            .enumerate()
            .map(|(index, reason)| format!("{}. {reason}", index + 1)),
    );
    lines.extend([
        String::new(),
        "RECOMMENDATION:".to_string(),
        record.recommendation.clone(),
        String::new(),
        RULE.to_string(),
    ]);

    let mut body = lines.join("\n");
    body.push('\n');
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{find_location, ScoringEngine, SiteConditions, WeatherSnapshot};
    use chrono::TimeZone;

    #[test]
    fn missing_wind_and_pressure_render_as_zero() {
        let location = find_location("dubai").expect("known location").clone();
        let site = SiteConditions::new(
            location,
            WeatherSnapshot {
                wind_speed: None,
                pressure_hpa: None,
                ..WeatherSnapshot::fallback()
            },
        );
        let engine = ScoringEngine::new();
        let analysis = engine.seeding(&site);
        let generated_at = Utc.with_ymd_and_hms(2024, 4, 16, 9, 30, 0).unwrap();
        let risk = engine.flood(&site).risk();
        let record = DecisionRecord::local(&site, &analysis, risk, generated_at);

        let body = render_report(&record, generated_at);

        assert!(body.contains("- Wind Speed: 0 m/s"));
        assert!(body.contains("- Pressure: 0 hPa"));
        assert!(body.contains("LOCATION: Dubai"));
        assert!(body.ends_with(&format!("{RULE}\n")));
    }
}
