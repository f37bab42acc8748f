use crate::cli::ServeArgs;
use crate::infra::{session_authenticator, AppState, ConfiguredAdvisor};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use smartpack::config::AppConfig;
use smartpack::error::AppError;
use smartpack::service::PackagingService;
use smartpack::store::InMemoryPackagingStore;
use smartpack::telemetry::{self, LogSink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, LogSink::Stdout)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryPackagingStore::new());
    let advisor = Arc::new(ConfiguredAdvisor::from_config(&config.advisor)?);
    let sessions = Arc::new(session_authenticator(&config.auth));
    let service = Arc::new(PackagingService::new(store, advisor));

    let app = with_api_routes(service, sessions)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "smartpack api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
