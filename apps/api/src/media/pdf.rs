use axum::extract::Multipart;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Extracts plain text from an in-memory PDF on the blocking pool.
pub async fn extract_pdf_text(pdf: Bytes) -> Result<String, AppError> {
    if pdf.is_empty() {
        return Err(AppError::UnprocessableEntity("Uploaded file is empty".to_string()));
    }

    let size = pdf.len();
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf)).await;

    match result {
        Ok(Ok(text)) => {
            debug!("Extracted {} chars from {} byte PDF", text.len(), size);
            Ok(text)
        }
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e}");
            Err(AppError::UnprocessableEntity(
                "Could not read text from the PDF".to_string(),
            ))
        }
        // pdf-extract panics on some malformed documents
        Err(e) if e.is_panic() => {
            warn!("PDF extraction panicked");
            Err(AppError::UnprocessableEntity(
                "Could not read text from the PDF".to_string(),
            ))
        }
        Err(e) => Err(AppError::Internal(e.into())),
    }
}

/// The parts of an upload form: the document and an optional per-user Gemini key.
#[derive(Debug)]
pub struct Upload {
    pub file: Bytes,
    pub api_key: Option<String>,
}

/// Reads the `file` and `apiKey` parts of a multipart upload. Other parts are ignored.
pub async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut file = None;
    let mut api_key = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                file = Some(bytes);
            }
            Some("apiKey") => {
                let key = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                api_key = Some(key.trim().to_string()).filter(|k| !k.is_empty());
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    Ok(Upload { file, api_key })
}
