use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use loandesk::config::AppConfig;
use loandesk::error::AppError;
use loandesk::lending::{EvaluationConfig, JsonFileDecisionStore, LoanDecisionService};
use loandesk::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{AppState, JsonCustomerBook};
use crate::routes::with_lending_routes;

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

    let provider = if config.data.customers_path.is_file() {
        Arc::new(JsonCustomerBook::from_path(&config.data.customers_path)?)
    } else {
        info!(
            path = %config.data.customers_path.display(),
            "customer seed file missing, serving the built-in sample book"
        );
        Arc::new(JsonCustomerBook::sample(Utc::now().date_naive()))
    };
    let store = Arc::new(JsonFileDecisionStore::new(config.store.path.clone()));
    let decision_service = Arc::new(LoanDecisionService::new(
        provider,
        store,
        EvaluationConfig::default(),
        config.store.policy,
    ));

    let app = with_lending_routes(decision_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = config.store.policy.label(),
        "loan decision service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
