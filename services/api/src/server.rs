use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRecordStore};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use tyl_analytics::config::AppConfig;
use tyl_analytics::error::AppError;
use tyl_analytics::telemetry;
use tyl_analytics::workflows::tyl::TylAnalysisService;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let rules = config.tyl.rules()?;
    let store = match (args.profiles.take(), args.marks.take()) {
        (Some(profiles), Some(marks)) => {
            let store = InMemoryRecordStore::from_csv(&profiles, &marks)?;
            info!(profiles = %profiles.display(), marks = %marks.display(), "seeded record store");
            store
        }
        _ => InMemoryRecordStore::default(),
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let service = Arc::new(TylAnalysisService::new(Arc::new(store), rules));

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "tyl analytics service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
