//! Axum route handler for resume upload.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resume_id: Uuid,
    pub filename: String,
    pub size: usize,
    pub message: String,
}

/// POST /upload_resume
///
/// Multipart form with a `file` part (UTF-8 bytes) or a `text` part; the
/// file wins when both are present. Returns the generated opaque id — never
/// the storage path.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart request: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("resume.txt").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read file part: {e}")))?;
                file = Some((filename, bytes.to_vec()));
            }
            Some("text") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read text part: {e}")))?;
                text = Some(value);
            }
            _ => {}
        }
    }

    let (resume_text, filename) = decode_upload(file, text)?;

    let resume_id = state.store.put(&resume_text).await.map_err(AppError::Internal)?;
    info!("Uploaded resume {resume_id} ({filename})");

    Ok(Json(UploadResponse {
        resume_id,
        filename,
        size: resume_text.chars().count(),
        message: "Resume uploaded successfully".to_string(),
    }))
}

/// Picks the resume text out of the upload parts. File wins over text;
/// blank text counts as absent; file bytes must be UTF-8.
fn decode_upload(
    file: Option<(String, Vec<u8>)>,
    text: Option<String>,
) -> Result<(String, String), AppError> {
    if let Some((filename, bytes)) = file {
        let content = String::from_utf8(bytes)
            .map_err(|_| AppError::Validation("Resume file must be UTF-8 text".to_string()))?;
        return Ok((content, filename));
    }

    if let Some(text) = text.filter(|text| !text.trim().is_empty()) {
        return Ok((text, "resume.txt".to_string()));
    }

    Err(AppError::Validation(
        "Either file or text must be provided".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_file_wins_over_text() {
        let (content, filename) = decode_upload(
            Some(("cv.txt".to_string(), b"from file".to_vec())),
            Some("from text".to_string()),
        )
        .unwrap();
        assert_eq!(content, "from file");
        assert_eq!(filename, "cv.txt");
    }

    #[test]
    fn test_decode_text_uses_default_filename() {
        let (content, filename) = decode_upload(None, Some("inline resume".to_string())).unwrap();
        assert_eq!(content, "inline resume");
        assert_eq!(filename, "resume.txt");
    }

    #[test]
    fn test_decode_rejects_non_utf8_file() {
        let result = decode_upload(Some(("cv.txt".to_string(), vec![0xff, 0xfe])), None);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_decode_blank_text_counts_as_absent() {
        let result = decode_upload(None, Some("   \n".to_string()));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_decode_nothing_is_a_validation_error() {
        let result = decode_upload(None, None);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
