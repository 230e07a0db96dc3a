use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_subsidy_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use subsidiematch::config::AppConfig;
use subsidiematch::error::AppError;
use subsidiematch::subsidies::matching::MatchService;
use subsidiematch::subsidies::{load_rules, SubsidyStore};
use subsidiematch::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(data_dir) = args.data_dir.take() {
        config.corpus.data_dir = data_dir;
    }
    if let Some(rules_dir) = args.rules_dir.take() {
        config.corpus.rules_dir = rules_dir;
    }

    telemetry::init(&config.telemetry)?;

    let store = Arc::new(SubsidyStore::load(&config.corpus.data_dir));
    if !store.is_loaded() {
        warn!(
            data_dir = %config.corpus.data_dir.display(),
            "subsidy corpus is empty, lookups will return no results"
        );
    }

    let rules = load_rules(&config.corpus.rules_dir);
    let match_service = Arc::new(MatchService::new(rules));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        store: store.clone(),
    };

    let app = with_subsidy_routes(match_service.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    let stats = store.stats();
    info!(
        ?config.environment,
        %addr,
        corpus_entries = stats.total_entries,
        matcher_rules = match_service.rule_count(),
        "subsidy matching service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
