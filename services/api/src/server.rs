use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_dialog_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ielts_band::config::AppConfig;
use ielts_band::dialog::{DialogService, InMemorySessionStore};
use ielts_band::error::AppError;
use ielts_band::telemetry;
use std::sync::atomic::Ordering;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemorySessionStore::default());
    let dialog_service = Arc::new(DialogService::new(store));

    let app = with_dialog_routes(dialog_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        messaging_token = config.transport.token.is_some(),
        "ielts band calculator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
