use crate::cli::ServeArgs;
use crate::infra::{dashboard_service, ApiService, AppState};
use crate::routes::with_dashboard_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uae_flood::config::AppConfig;
use uae_flood::error::AppError;
use uae_flood::providers::SnapshotOrigin;
use uae_flood::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(seed) = args.seed.take() {
        config.weather.demo_seed = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = dashboard_service(&config, false)?;
    let refresh_task = spawn_refresh_loop(Arc::clone(&service), config.weather.refresh_interval);

    let app = with_dashboard_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "flood dashboard ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresh_task.abort();
    info!("flood dashboard stopped");
    Ok(())
}

/// Refreshes every location immediately, then once per interval.
fn spawn_refresh_loop(service: Arc<ApiService>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let outcomes = service.refresh_weather().await;
            let fallbacks = outcomes
                .iter()
                .filter(|outcome| outcome.origin == SnapshotOrigin::Fallback)
                .count();
            if fallbacks > 0 {
                warn!(fallbacks, "weather refresh used fallback values");
            }

            let labelled = service.refresh_remote_risk().await;
            debug!(
                locations = outcomes.len(),
                labelled,
                data_mode = service.mode_indicator().data_mode.label(),
                "weather refresh complete"
            );
        }
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
