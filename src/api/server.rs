use crate::api::cli::ServeArgs;
use crate::api::infra::{AppState, InMemoryWaitlistRepository, LoggingNotifier};
use crate::api::routes::app_router;
use crate::config::AppConfig;
use crate::dashboard::DashboardDefaults;
use crate::error::AppError;
use crate::finance::{AssumptionConfig, UnitEconomics};
use crate::signup::{AdminGuard, NotificationSettings, SignupService};
use crate::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    telemetry::init(&config.telemetry)?;

    let assumptions = match &config.projection.assumptions_path {
        Some(path) => {
            info!(path = %path.display(), "loading projection assumptions");
            AssumptionConfig::from_path(path)?
        }
        None => AssumptionConfig::default(),
    };
    let dashboard = Arc::new(DashboardDefaults {
        assumptions,
        unit_economics: UnitEconomics::default(),
    });

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let settings = NotificationSettings {
        admin_email: config.admin.notify_email.clone(),
        ..NotificationSettings::default()
    };
    let signup = Arc::new(SignupService::new(
        Arc::new(InMemoryWaitlistRepository::default()),
        Arc::new(LoggingNotifier::default()),
        settings,
    ));
    let admin = AdminGuard::new(config.admin.shared_secret.clone());

    let app = app_router(signup, admin, dashboard)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "platetrend service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
