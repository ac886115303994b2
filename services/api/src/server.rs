use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryAccountDirectory, InMemoryAssessmentRepository, InMemoryCommunityRepository,
    OpenAiChatProvider,
};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use stillmind::assessments::AssessmentService;
use stillmind::auth::{AuthService, TokenAuthenticator};
use stillmind::chat::ChatService;
use stillmind::community::CommunityService;
use stillmind::config::AppConfig;
use stillmind::error::AppError;
use stillmind::telemetry;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.auth.uses_dev_secret() {
        warn!("running with the built-in development JWT secret");
    }
    if config.ai.api_key.is_none() {
        warn!("assistant provider not configured; /api/v1/ai routes will report errors");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let tokens = Arc::new(TokenAuthenticator::new(&config.auth));
    let directory = Arc::new(InMemoryAccountDirectory::default());
    let assessments = Arc::new(AssessmentService::new(Arc::new(
        InMemoryAssessmentRepository::default(),
    )));
    let auth = Arc::new(AuthService::new(directory.clone(), tokens.clone()));
    let community = Arc::new(CommunityService::new(Arc::new(
        InMemoryCommunityRepository::default(),
    )));
    let chat = Arc::new(ChatService::new(Arc::new(OpenAiChatProvider::new(
        config.ai.clone(),
    ))));

    let app = with_api_routes(assessments, auth, directory, community, chat)
        .layer(Extension(app_state))
        .layer(Extension(tokens))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "stillmind service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
