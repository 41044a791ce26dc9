use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::service::{DashboardError, DashboardService};
use super::state::{DecisionMode, RainfallSimulation, DEFAULT_SIMULATED_RAINFALL_MM};
use crate::providers::{DecisionBackend, WeatherProvider};

type SharedService<W, D> = Arc<DashboardService<W, D>>;

/// Router exposing the dashboard over JSON.
pub fn dashboard_router<W, D>(service: SharedService<W, D>) -> Router
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    Router::new()
        .route("/api/v1/locations", get(overview_handler::<W, D>))
        .route("/api/v1/locations/:location_id", get(location_handler::<W, D>))
        .route(
            "/api/v1/locations/:location_id/analysis",
            post(analysis_handler::<W, D>),
        )
        .route("/api/v1/agriculture", get(agriculture_handler::<W, D>))
        .route("/api/v1/hydropower", get(hydropower_handler::<W, D>))
        .route("/api/v1/alerts", get(alerts_handler::<W, D>))
        .route("/api/v1/history", get(history_handler::<W, D>))
        .route("/api/v1/notices", get(notices_handler::<W, D>))
        .route("/api/v1/mode", put(mode_handler::<W, D>))
        .route("/api/v1/simulation", put(simulation_handler::<W, D>))
        .route("/api/v1/weather/refresh", post(refresh_handler::<W, D>))
        .route("/api/v1/reports/latest", get(report_handler::<W, D>))
        .with_state(service)
}

fn error_response(error: DashboardError) -> Response {
    let status = match error {
        DashboardError::UnknownLocation(_) | DashboardError::NoDecisionYet => {
            StatusCode::NOT_FOUND
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn overview_handler<W, D>(State(service): State<SharedService<W, D>>) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    (StatusCode::OK, axum::Json(service.overview())).into_response()
}

pub(crate) async fn location_handler<W, D>(
    State(service): State<SharedService<W, D>>,
    Path(location_id): Path<String>,
) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    match service.location(&location_id) {
        Ok(view) => {
            let payload = json!({
                "mode": service.mode_indicator(),
                "location": view,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn analysis_handler<W, D>(
    State(service): State<SharedService<W, D>>,
    Path(location_id): Path<String>,
) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    match service.analyze(&location_id).await {
        Ok(record) => {
            let payload = json!({
                "mode": service.mode_indicator(),
                "analysis": record,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn agriculture_handler<W, D>(
    State(service): State<SharedService<W, D>>,
) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    (StatusCode::OK, axum::Json(service.agriculture())).into_response()
}

pub(crate) async fn hydropower_handler<W, D>(
    State(service): State<SharedService<W, D>>,
) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    (StatusCode::OK, axum::Json(service.hydropower())).into_response()
}

pub(crate) async fn alerts_handler<W, D>(State(service): State<SharedService<W, D>>) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    let payload = json!({ "alerts": service.alerts() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn history_handler<W, D>(State(service): State<SharedService<W, D>>) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    let payload = json!({ "analyses": service.history() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn notices_handler<W, D>(State(service): State<SharedService<W, D>>) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    let payload = json!({ "notices": service.notices() });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModeRequest {
    decision_mode: DecisionMode,
}

pub(crate) async fn mode_handler<W, D>(
    State(service): State<SharedService<W, D>>,
    axum::Json(request): axum::Json<ModeRequest>,
) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    let mode = service.set_decision_mode(request.decision_mode);
    if request.decision_mode == DecisionMode::Remote {
        service.refresh_remote_risk().await;
    }
    (StatusCode::OK, axum::Json(json!({ "mode": mode }))).into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct SimulationRequest {
    enabled: bool,
    #[serde(default)]
    rainfall_mm: Option<f64>,
}

pub(crate) async fn simulation_handler<W, D>(
    State(service): State<SharedService<W, D>>,
    axum::Json(request): axum::Json<SimulationRequest>,
) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    let mut mode = service.set_simulation(RainfallSimulation {
        enabled: request.enabled,
        rainfall_mm: request.rainfall_mm.unwrap_or(DEFAULT_SIMULATED_RAINFALL_MM),
    });
    if mode.decision_mode == DecisionMode::Remote {
        service.refresh_remote_risk().await;
        mode = service.mode_indicator();
    }
    (StatusCode::OK, axum::Json(json!({ "mode": mode }))).into_response()
}

pub(crate) async fn refresh_handler<W, D>(State(service): State<SharedService<W, D>>) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    let outcomes = service.refresh_weather().await;
    let remote_labels = service.refresh_remote_risk().await;
    let payload = json!({
        "mode": service.mode_indicator(),
        "locations": outcomes,
        "remote_labels": remote_labels,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn report_handler<W, D>(State(service): State<SharedService<W, D>>) -> Response
where
    W: WeatherProvider,
    D: DecisionBackend,
{
    match service.latest_report(Utc::now()) {
        Ok(report) => {
            let disposition = format!("attachment; filename=\"{}\"", report.file_name);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                report.body,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}
