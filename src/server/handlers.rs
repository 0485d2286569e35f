use super::types::{AttendanceStateRequest, ClassOverview, ClassSummaryResponse, ErrorResponse};
use crate::{
    Error,
    catalog::{AttendanceRecord, AttendanceStore, Class},
    flows::{
        ClassSummary, ClassSummaryRequest, FaceMatchRequest, FaceMatchSuggestion,
        generate_class_summary, resolve_ambiguous_match,
    },
    llm::LlmClient,
    reports::{self, ReportRow},
    scan::{ScanOutcome, simulate_scan},
};
use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmClient>,
    pub store: Arc<dyn AttendanceStore>,
    pub teacher_name: String,
    pub presence_probability: f64,
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

fn api_error(e: Error) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::ClassNotFound { .. } => StatusCode::NOT_FOUND,
        e if e.is_upstream() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Request failed: {}", e);
    } else {
        warn!("Request rejected: {}", e);
    }

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_classes(State(state): State<AppState>) -> ApiResult<Json<Vec<ClassOverview>>> {
    let classes = state.store.list_classes().await.map_err(api_error)?;
    Ok(Json(classes.into_iter().map(ClassOverview::from).collect()))
}

pub async fn get_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
) -> ApiResult<Json<Class>> {
    let class = state.store.get_class(&class_id).await.map_err(api_error)?;
    Ok(Json(class))
}

pub async fn scan_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Json(request): Json<AttendanceStateRequest>,
) -> ApiResult<Json<ScanOutcome>> {
    let class = state.store.get_class(&class_id).await.map_err(api_error)?;

    let outcome = {
        let mut rng = rand::thread_rng();
        simulate_scan(
            &class,
            &request.present,
            state.presence_probability,
            &mut rng,
        )
    }
    .map_err(api_error)?;

    info!(
        "Scan for {} finished: {} present, {} absent",
        class_id,
        outcome.present.len(),
        outcome.absent.len()
    );
    Ok(Json(outcome))
}

pub async fn summarize_class(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Json(request): Json<AttendanceStateRequest>,
) -> ApiResult<Json<ClassSummaryResponse>> {
    let class = state.store.get_class(&class_id).await.map_err(api_error)?;
    let (present, absent) = class.partition(&request.present).map_err(api_error)?;
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());

    let summary_request = ClassSummaryRequest {
        class_id: class.id.clone(),
        date: date.to_string(),
        present_students: present.iter().map(|s| s.name.clone()).collect(),
        absent_students: absent.iter().map(|s| s.name.clone()).collect(),
        total_students: class.student_count() as u32,
    };

    info!("Generating attendance summary for {} on {}", class_id, date);
    let ClassSummary { summary } = generate_class_summary(state.llm.as_ref(), &summary_request)
        .await
        .map_err(api_error)?;

    Ok(Json(ClassSummaryResponse {
        class_id: class.id,
        date,
        present,
        absent,
        summary,
    }))
}

pub async fn confirm_attendance(
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    Json(request): Json<AttendanceStateRequest>,
) -> ApiResult<(StatusCode, Json<AttendanceRecord>)> {
    let class = state.store.get_class(&class_id).await.map_err(api_error)?;
    let (present, absent) = class.partition(&request.present).map_err(api_error)?;
    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());

    let record = AttendanceRecord::new(
        &class,
        date,
        present.len() as u32,
        absent.len() as u32,
        state.teacher_name.clone(),
    );
    let record = state
        .store
        .record_attendance(record)
        .await
        .map_err(api_error)?;

    info!(
        "Attendance for {} confirmed by {}: {} present, {} absent",
        class.name, record.confirmed_by, record.present, record.absent
    );
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_reports(State(state): State<AppState>) -> ApiResult<Json<Vec<ReportRow>>> {
    let records = state.store.list_records().await.map_err(api_error)?;
    Ok(Json(reports::rows(&records)))
}

pub async fn export_reports_csv(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let records = state.store.list_records().await.map_err(api_error)?;
    info!("Exporting {} attendance records as CSV", records.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"attendance-report.csv\"",
            ),
        ],
        reports::to_csv(&records),
    ))
}

pub async fn face_match(
    State(state): State<AppState>,
    Json(request): Json<FaceMatchRequest>,
) -> ApiResult<Json<FaceMatchSuggestion>> {
    info!(
        "Resolving ambiguous face match among {} candidates",
        request.possible_matches.len()
    );

    let suggestion = resolve_ambiguous_match(state.llm.as_ref(), &request)
        .await
        .map_err(api_error)?;
    Ok(Json(suggestion))
}

pub async fn class_summary(
    State(state): State<AppState>,
    Json(request): Json<ClassSummaryRequest>,
) -> ApiResult<Json<ClassSummary>> {
    info!(
        "Generating attendance summary for {} on {}",
        request.class_id, request.date
    );

    let summary = generate_class_summary(state.llm.as_ref(), &request)
        .await
        .map_err(api_error)?;
    Ok(Json(summary))
}
