//! Axum route handlers for speech and document endpoints.

use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::media::pdf::read_upload;
use crate::media::{extract_pdf_text, tts::TtsError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsRequest {
    pub text: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PdfTextResponse {
    pub text: String,
}

/// POST /api/elevenlabs/tts
///
/// Returns `audio/mpeg` bytes for the given text.
pub async fn handle_tts(
    State(state): State<AppState>,
    Json(request): Json<TtsRequest>,
) -> Result<Response, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let audio = state
        .tts
        .synthesize(&request.text, request.api_key.as_deref())
        .await
        .map_err(|e| match e {
            TtsError::MissingKey => {
                AppError::NotConfigured("ElevenLabs API key not configured".to_string())
            }
            other => AppError::Tts(other),
        })?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg".to_string()),
            (header::CONTENT_LENGTH, audio.len().to_string()),
        ],
        audio,
    )
        .into_response())
}

/// POST /api/parse-pdf
///
/// Multipart upload with a `file` part; returns the extracted text.
pub async fn handle_parse_pdf(multipart: Multipart) -> Result<Json<PdfTextResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let text = extract_pdf_text(upload.file).await?;
    Ok(Json(PdfTextResponse { text }))
}
