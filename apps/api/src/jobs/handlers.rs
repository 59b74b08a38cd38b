use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::extract::{extract_text, validate_upload, DocumentFormat};
use crate::jobs::pipeline::{run_analysis, AnalysisRequest, AnalysisResult};
use crate::jobs::store::{JobRecord, JobStatus};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub message: String,
    pub filename: String,
    pub file_size: usize,
}

/// POST /api/v1/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let result = run_analysis(&state.composer, state.fit_scorer.as_ref(), &req).await?;
    Ok(Json(result))
}

/// POST /api/v1/upload
///
/// Fields: `file` (required), `job_description`, `include_grammar`.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut job_description = None;
    let mut include_grammar = true;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("Uploaded file has no filename".into()))?;
                file = Some((filename, field.bytes().await?));
            }
            Some("job_description") => job_description = Some(field.text().await?),
            Some("include_grammar") => {
                include_grammar = !field.text().await?.trim().eq_ignore_ascii_case("false")
            }
            _ => {}
        }
    }

    let (filename, data) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let format = validate_upload(&filename, &data, state.config.max_upload_bytes)?;

    let record = JobRecord::processing(Uuid::new_v4(), &filename, data.len());
    state.jobs.put(record.clone()).await;
    info!(job_id = %record.job_id, %filename, size = data.len(), "upload accepted");

    let response = UploadResponse {
        job_id: record.job_id,
        status: record.status,
        message: "Resume received for analysis.".to_string(),
        filename,
        file_size: record.file_size,
    };

    tokio::spawn(process_upload(
        state,
        UploadJob {
            record,
            format,
            data,
            job_description,
            include_grammar,
        },
    ));

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// GET /api/v1/results/:job_id
pub async fn handle_get_results(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRecord>, AppError> {
    state
        .jobs
        .get(job_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}

struct UploadJob {
    record: JobRecord,
    format: DocumentFormat,
    data: Bytes,
    job_description: Option<String>,
    include_grammar: bool,
}

async fn process_upload(state: AppState, job: UploadJob) {
    let job_id = job.record.job_id;
    let data = job.data;
    let format = job.format;

    let outcome = match tokio::task::spawn_blocking(move || extract_text(format, &data)).await {
        Ok(Ok(resume_text)) => {
            let request = AnalysisRequest {
                resume_text,
                job_description: job.job_description,
                include_grammar: job.include_grammar,
            };
            run_analysis(&state.composer, state.fit_scorer.as_ref(), &request)
                .await
                .map_err(|e| e.to_string())
        }
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(format!("Extraction task failed: {e}")),
    };

    let record = match outcome {
        Ok(result) => {
            info!(%job_id, score = result.feedback.overall_score, "upload analysed");
            job.record.completed(result)
        }
        Err(reason) => {
            warn!(%job_id, %reason, "upload analysis failed");
            job.record.failed(reason)
        }
    };
    state.jobs.put(record).await;
}
