use std::sync::Arc;
use std::time::Instant;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::common::UploadImage;
use crate::service::{
    aggregate, detection_headers, render_binary, render_json, validate_confidence,
    validate_content_type, BinaryImage, DetectJsonResponse, DetectionResult, HealthReport,
    ServiceError, ServiceState, StatusReport, DEFAULT_CONFIDENCE,
};

const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Assembles the service router with permissive CORS for dashboard clients.
pub fn router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/detect", post(detect))
        .route("/detect-json", post(detect_json))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct DetectParams {
    confidence: Option<String>,
}

async fn root(State(state): State<Arc<ServiceState>>) -> Json<StatusReport> {
    Json(StatusReport::from_state(&state))
}

async fn health(State(state): State<Arc<ServiceState>>) -> Json<HealthReport> {
    Json(HealthReport::from_state(&state))
}

/// `POST /detect`: annotated PNG (or the untouched upload when nothing was
/// found) plus metadata headers. Validation failures are client errors;
/// everything else is a server error.
async fn detect(
    State(state): State<Arc<ServiceState>>,
    Query(params): Query<DetectParams>,
    multipart: Multipart,
) -> Result<Response, ServiceError> {
    let started = Instant::now();
    let confidence = parse_confidence(&params)?;
    let upload = read_upload(multipart).await?;
    let output = run_pipeline(state, upload, confidence, started).await?;
    log_outcome(&output);

    let mut headers = detection_headers(&output.result, output.processing_seconds);
    let content_type = HeaderValue::from_str(output.image.content_type())
        .map_err(|err| ServiceError::Render(err.to_string()))?;
    headers.insert(CONTENT_TYPE, content_type);

    Ok((headers, output.image.into_bytes()).into_response())
}

/// `POST /detect-json`: always answers 200 with a document; failures are
/// reported in-band as `{success: false, error}` rather than as a transport
/// status. Deliberate asymmetry with `/detect`.
async fn detect_json(
    State(state): State<Arc<ServiceState>>,
    Query(params): Query<DetectParams>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<DetectJsonResponse> {
    let started = Instant::now();
    let document = match detect_json_inner(state, params, multipart, started).await {
        Ok(document) => document,
        Err(err) => {
            tracing::warn!(error = %err, "detect-json reporting failure in-band");
            DetectJsonResponse::failure(err.to_string())
        }
    };
    Json(document)
}

async fn detect_json_inner(
    state: Arc<ServiceState>,
    params: DetectParams,
    multipart: Result<Multipart, MultipartRejection>,
    started: Instant,
) -> Result<DetectJsonResponse, ServiceError> {
    let confidence = parse_confidence(&params)?;
    let multipart = multipart.map_err(|err| ServiceError::BadUpload(err.to_string()))?;
    let upload = read_upload(multipart).await?;
    let output = run_pipeline(state, upload, confidence, started).await?;
    log_outcome(&output);

    Ok(render_json(
        &output.result,
        &output.image,
        output.processing_seconds,
        output.filename.clone(),
    ))
}

fn parse_confidence(params: &DetectParams) -> Result<f32, ServiceError> {
    match &params.confidence {
        Some(raw) => {
            let value = raw
                .parse::<f32>()
                .map_err(|_| ServiceError::InvalidConfidence(raw.clone()))?;
            validate_confidence(value)
        }
        None => Ok(DEFAULT_CONFIDENCE),
    }
}

/// Pulls the `file` part out of the multipart form. The content type is
/// checked before the payload is buffered, so a rejected upload does no
/// decode or inference work.
async fn read_upload(mut multipart: Multipart) -> Result<UploadImage, ServiceError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ServiceError::BadUpload(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = field.file_name().map(str::to_string);
        validate_content_type(&content_type)?;

        let bytes = field
            .bytes()
            .await
            .map_err(|err| ServiceError::BadUpload(err.to_string()))?
            .to_vec();
        return crate::service::decode_upload(bytes, content_type, filename);
    }

    Err(ServiceError::BadUpload(
        "missing multipart field 'file'".to_string(),
    ))
}

struct PipelineOutput {
    result: DetectionResult,
    image: BinaryImage,
    processing_seconds: f64,
    filename: Option<String>,
}

/// Runs inference, aggregation and binary rendering on the blocking pool.
/// The request waits for completion; there is no queueing, timeout, retry or
/// cancellation, and a client disconnect does not preempt a running pass.
async fn run_pipeline(
    state: Arc<ServiceState>,
    upload: UploadImage,
    confidence: f32,
    started: Instant,
) -> Result<PipelineOutput, ServiceError> {
    // Refuse before scheduling work when the model never loaded.
    state.detector()?;
    tracing::info!(filename = %upload.display_name(), confidence, "running detection");

    let handle = tokio::task::spawn_blocking(move || {
        let detector = Arc::clone(state.detector()?);
        let raw = detector
            .detect(&upload.image, confidence)
            .map_err(|err| ServiceError::Inference(err.to_string()))?;
        let result = aggregate(raw, |class_id| {
            detector.class_name(class_id).map(str::to_string)
        });
        let image = render_binary(&upload, &result, &state.annotator)?;

        Ok(PipelineOutput {
            result,
            image,
            processing_seconds: started.elapsed().as_secs_f64(),
            filename: upload.filename,
        })
    });

    handle
        .await
        .map_err(|err| ServiceError::Inference(format!("detection task failed: {err}")))?
}

fn log_outcome(output: &PipelineOutput) {
    tracing::info!(
        filename = %output.filename.as_deref().unwrap_or("upload"),
        detections = output.result.count,
        max_confidence = output.result.max_confidence,
        seconds = output.processing_seconds,
        "detection complete"
    );
}
