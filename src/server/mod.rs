pub mod handlers;
pub mod types;

use crate::{
    Result,
    catalog::{AttendanceStore, InMemoryStore},
    config::Config,
    llm::{LlmClient, OpenAiClient},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

// Camera stills arrive base64-encoded inside the JSON body.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/classes", get(handlers::list_classes))
        .route("/classes/:class_id", get(handlers::get_class))
        .route("/classes/:class_id/scan", post(handlers::scan_class))
        .route("/classes/:class_id/summary", post(handlers::summarize_class))
        .route(
            "/classes/:class_id/attendance",
            post(handlers::confirm_attendance),
        )
        .route("/reports", get(handlers::list_reports))
        .route("/reports/export.csv", get(handlers::export_reports_csv))
        .route("/flows/face-match", post(handlers::face_match))
        .route("/flows/class-summary", post(handlers::class_summary))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(config.llm.clone()));
    let store: Arc<dyn AttendanceStore> = Arc::new(InMemoryStore::seeded());

    info!(
        "Using {} model '{}' for attendance flows",
        config.llm.provider, config.llm.model
    );

    let app_state = AppState {
        llm,
        store,
        teacher_name: config.school.teacher_name.clone(),
        presence_probability: config.simulation.presence_probability,
    };

    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
