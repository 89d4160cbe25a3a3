use crate::cli::ServeArgs;
use crate::infra::{standard_catalog, AppState, InMemoryAlertPublisher, InMemoryLoanRepository};
use crate::routes::with_origination_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use loandesk::config::AppConfig;
use loandesk::error::AppError;
use loandesk::telemetry;
use loandesk::workflows::origination::{
    CatalogImporter, LoanOriginationService, PricingConfig, ProductCatalog,
};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = load_catalog(&config)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryLoanRepository::default());
    let alerts = Arc::new(InMemoryAlertPublisher::default());
    let origination_service = Arc::new(LoanOriginationService::new(
        repository,
        alerts,
        catalog,
        PricingConfig::default(),
    ));

    let app = with_origination_routes(origination_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "loan origination service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn load_catalog(config: &AppConfig) -> Result<ProductCatalog, AppError> {
    match &config.catalog.csv_path {
        Some(path) => {
            let catalog = CatalogImporter::from_path(path)?;
            info!(path = %path.display(), products = catalog.products().len(), "catalog imported");
            Ok(catalog)
        }
        None => Ok(standard_catalog()),
    }
}
