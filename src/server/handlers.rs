use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use log::{info, warn};
use serde::Serialize;

use crate::input::file_detector::{is_allowed_upload, ALLOWED_UPLOAD_EXTENSIONS};
use crate::output::report::ScreeningReport;
use crate::processing::catalog::RoleCatalog;
use crate::server::errors::ApiError;
use crate::server::state::AppState;
use crate::server::upload::save_upload;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model: String,
    pub dimension: usize,
    pub roles: usize,
}

#[derive(Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// First file part named `field`: its client filename and contents
async fn read_file_field(
    multipart: &mut Multipart,
    field: &str,
) -> Result<Option<(String, Bytes)>, ApiError> {
    while let Some(part) = multipart.next_field().await? {
        if part.name() == Some(field) {
            let file_name = part.file_name().unwrap_or_default().to_string();
            let data = part.bytes().await?;
            return Ok(Some((file_name, data)));
        }
    }
    Ok(None)
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model: state.screener.model_name().to_string(),
        dimension: state.screener.embedding_dimension(),
        roles: state.screener.catalog().len(),
    })
}

/// GET /api/roles
pub async fn list_roles(State(state): State<AppState>) -> Json<RoleCatalog> {
    Json(state.screener.catalog().clone())
}

/// POST /upload_resume
pub async fn upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningReport>, ApiError> {
    let (file_name, data) = read_file_field(&mut multipart, "resume")
        .await?
        .ok_or_else(|| ApiError::Validation("No file uploaded".to_string()))?;

    if file_name.is_empty() {
        return Err(ApiError::Validation("No selected file".to_string()));
    }
    if !is_allowed_upload(&file_name) {
        return Err(ApiError::UnsupportedFileType(format!(
            "'{}' is not one of: {}",
            file_name,
            ALLOWED_UPLOAD_EXTENSIONS.join(", ")
        )));
    }

    let saved = save_upload(&state.upload_dir, &file_name, &data).await?;
    info!(
        "Screening upload '{}' ({} bytes) saved as {}",
        file_name,
        data.len(),
        saved.path.display()
    );

    let outcome = state.screener.screen_file(&saved.path, &saved.extension).await;
    let report = ScreeningReport::from_outcome(&file_name, outcome, &state.screener, true);
    if report.is_low_confidence() {
        warn!(
            "No text extracted from upload '{}'; returning uninformative scores",
            file_name
        );
    }

    Ok(Json(report))
}

/// POST /extract_text
pub async fn extract_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractTextResponse>, ApiError> {
    let Some((file_name, data)) = read_file_field(&mut multipart, "file").await? else {
        return Ok(Json(ExtractTextResponse {
            text: String::new(),
            warning: None,
        }));
    };

    let saved = save_upload(&state.upload_dir, &file_name, &data).await?;
    info!("Extracting text from upload '{}' saved as {}", file_name, saved.path.display());

    let response = match state.screener.input().extract(&saved.path, &saved.extension).await {
        Ok(text) => ExtractTextResponse { text, warning: None },
        Err(e) => {
            crate::input::manager::log_extraction_failure(&e);
            ExtractTextResponse {
                text: String::new(),
                warning: Some(e.to_string()),
            }
        }
    };

    Ok(Json(response))
}
