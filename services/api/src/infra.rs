use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use uae_flood::config::{AppConfig, WeatherConfig};
use uae_flood::dashboard::DashboardService;
use uae_flood::error::AppError;
use uae_flood::providers::{
    DecisionServiceClient, DemoWeatherGenerator, OpenWeatherClient, WeatherSource,
};

pub(crate) type ApiService = DashboardService<WeatherSource, DecisionServiceClient>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Live weather when an API key is configured, generated weather otherwise.
pub(crate) fn weather_source(
    config: &WeatherConfig,
    force_demo: bool,
) -> Result<WeatherSource, AppError> {
    if !force_demo {
        if let Some(client) = OpenWeatherClient::from_config(config)? {
            return Ok(WeatherSource::Live(client));
        }
    }

    Ok(WeatherSource::Demo(DemoWeatherGenerator::from_seed(
        config.demo_seed,
    )))
}

pub(crate) fn dashboard_service(
    config: &AppConfig,
    force_demo: bool,
) -> Result<Arc<ApiService>, AppError> {
    let weather = weather_source(&config.weather, force_demo)?;
    let backend = DecisionServiceClient::from_config(&config.decision)?;

    Ok(Arc::new(DashboardService::with_timeout(
        Arc::new(weather),
        Arc::new(backend),
        config.weather.timeout,
    )))
}
