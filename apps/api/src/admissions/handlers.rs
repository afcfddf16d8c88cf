//! Axum route handlers for the AI-backed admissions features.
//!
//! Each handler builds a prompt, calls the configured `TextGenerator`, and runs
//! the reply through the matching parser in `crate::parsing`.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::admissions::prompts::{
    CHANCE_PROMPT, CHAT_PROMPT, ESSAY_FEEDBACK_PROMPT, ESSAY_FEEDBACK_UNAVAILABLE, PLAN_PROMPT,
    QUESTIONS_PDF_PROMPT, QUESTIONS_PROMPT,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{resolve_personality, with_personality};
use crate::llm_client::{GeminiClient, TextGenerator};
use crate::media::extract_pdf_text;
use crate::media::pdf::read_upload;
use crate::parsing::{
    format_plan, parse_plan, try_parse_fields, ChanceEstimate, FieldDescriptor, PlanItem,
};
use crate::state::AppState;
use crate::storage::keys;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChanceRequest {
    pub college: String,
    #[serde(default)]
    pub profile: Value,
    #[serde(default)]
    pub answers: Value,
    /// When set, the estimate is saved under `college.{id}.percent`.
    pub college_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct FieldsResponse {
    pub fields: Vec<FieldDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub end_date: String,
    #[serde(default)]
    pub profile: Value,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    /// Raw model text, as shown in the plan editor.
    pub plan: String,
    pub items: Vec<PlanItem>,
}

#[derive(Debug, Deserialize)]
pub struct EssayFeedbackRequest {
    pub essay: String,
}

#[derive(Debug, Serialize)]
pub struct EssayFeedbackResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub context: Value,
    /// Replaces the saved or default personality for this request.
    pub personality: Option<String>,
    /// The student's own Gemini key from the settings page.
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
    pub provider: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/gemini/chance
///
/// Estimates an admission percent for one college and buckets it.
pub async fn handle_chance(
    State(state): State<AppState>,
    Json(request): Json<ChanceRequest>,
) -> Result<Json<ChanceEstimate>, AppError> {
    let college = request.college.trim();
    if college.is_empty() {
        return Err(AppError::Validation("college cannot be empty".to_string()));
    }

    let prompt = CHANCE_PROMPT
        .replace("{college}", college)
        .replace("{profile}", &request.profile.to_string())
        .replace("{answers}", &request.answers.to_string());
    let text = generate(&state, &prompt).await?;
    let estimate = ChanceEstimate::from_text(&text);

    if let Some(college_id) = request.college_id.as_deref() {
        state
            .store
            .set(&keys::college_percent(college_id), json!(estimate.percent))
            .await?;
    }

    info!(
        "Chance estimate for {college}: {}% ({:?})",
        estimate.percent, estimate.category
    );
    Ok(Json(estimate))
}

/// POST /api/gemini/questions
///
/// Turns pasted application questions into form fields.
pub async fn handle_questions(
    State(state): State<AppState>,
    Json(request): Json<QuestionsRequest>,
) -> Result<Json<FieldsResponse>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }

    let prompt = QUESTIONS_PROMPT.replace("{questions}", &request.prompt);
    let text = generate(&state, &prompt).await?;
    Ok(Json(fields_response(&text)))
}

/// POST /api/gemini/questions-pdf
///
/// Same as `/questions`, with the questions read from an uploaded PDF.
/// An `apiKey` form part overrides the server's Gemini key.
pub async fn handle_questions_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<FieldsResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let llm = generator_for(&state, upload.api_key.as_deref())?;
    let document = extract_pdf_text(upload.file).await?;
    if document.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "The PDF contains no extractable text".to_string(),
        ));
    }

    let prompt = QUESTIONS_PDF_PROMPT.replace("{document}", &document);
    let text = generate_with(&state, llm.as_ref(), None, &prompt).await?;
    Ok(Json(fields_response(&text)))
}

/// POST /api/gemini/plan
///
/// Generates a dated plan ending by `endDate` and saves it for the plan editor.
pub async fn handle_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let end_date = request.end_date.trim();
    NaiveDate::parse_from_str(end_date, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!("endDate must be YYYY-MM-DD, got '{end_date}'"))
    })?;

    let prompt = PLAN_PROMPT
        .replace("{end_date}", end_date)
        .replace("{profile}", &request.profile.to_string());
    let plan = generate(&state, &prompt).await?;
    let items = parse_plan(&plan);

    let impossible = items
        .iter()
        .filter(|item| item.calendar_date().is_none())
        .count();
    if impossible > 0 {
        warn!("Plan contains {impossible} item(s) with impossible calendar dates");
    }
    if items.is_empty() {
        warn!("Plan reply contained no dated lines");
    }

    state.store.set(keys::PLAN_END_DATE, json!(end_date)).await?;
    state
        .store
        .set(keys::PLAN_TABLE, json!(format_plan(&items)))
        .await?;

    info!("Generated plan with {} items ending {end_date}", items.len());
    Ok(Json(PlanResponse { plan, items }))
}

/// POST /api/gemini/essay-feedback
///
/// Generator failures degrade to an apology with status 200 so the editor stays usable.
pub async fn handle_essay_feedback(
    State(state): State<AppState>,
    Json(request): Json<EssayFeedbackRequest>,
) -> Result<Json<EssayFeedbackResponse>, AppError> {
    if request.essay.trim().is_empty() {
        return Err(AppError::Validation("essay cannot be empty".to_string()));
    }

    let prompt = ESSAY_FEEDBACK_PROMPT.replace("{essay}", &request.essay);
    let response = match generate(&state, &prompt).await {
        Ok(text) => EssayFeedbackResponse { text, error: None },
        Err(e) => {
            warn!("Essay feedback failed: {e}");
            EssayFeedbackResponse {
                text: ESSAY_FEEDBACK_UNAVAILABLE.to_string(),
                error: Some("generation_failed".to_string()),
            }
        }
    };
    Ok(Json(response))
}

/// POST /api/gemini/chat
///
/// `personality` and `apiKey` in the body override the saved personality and
/// the server's Gemini key.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.messages.is_empty() {
        return Err(AppError::Validation("messages cannot be empty".to_string()));
    }

    let messages = serde_json::to_string(&request.messages).map_err(anyhow::Error::from)?;
    let prompt = CHAT_PROMPT
        .replace("{context}", &request.context.to_string())
        .replace("{messages}", &messages);
    let llm = generator_for(&state, request.api_key.as_deref())?;
    let text = generate_with(&state, llm.as_ref(), request.personality.as_deref(), &prompt).await?;

    Ok(Json(ChatResponse {
        text,
        provider: llm.provider(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn generate(state: &AppState, prompt: &str) -> Result<String, AppError> {
    generate_with(state, state.llm.as_ref(), None, prompt).await
}

/// Prefixes the prompt with `personality` when it is non-blank, otherwise with
/// the saved or default one.
async fn generate_with(
    state: &AppState,
    llm: &dyn TextGenerator,
    personality: Option<&str>,
    prompt: &str,
) -> Result<String, AppError> {
    let personality = match personality.map(str::trim).filter(|p| !p.is_empty()) {
        Some(custom) => custom.to_string(),
        None => resolve_personality(state.store.as_ref()).await,
    };
    let text = llm.generate(&with_personality(&personality, prompt)).await?;
    Ok(text)
}

/// A per-request key gets its own Gemini client; otherwise the shared generator is used.
fn generator_for(
    state: &AppState,
    api_key: Option<&str>,
) -> Result<Arc<dyn TextGenerator>, AppError> {
    match api_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => Ok(Arc::new(GeminiClient::new(key.to_string())?)),
        None => Ok(Arc::clone(&state.llm)),
    }
}

fn fields_response(text: &str) -> FieldsResponse {
    match try_parse_fields(text) {
        Ok(fields) => FieldsResponse {
            fields,
            error: None,
        },
        Err(e) => {
            warn!("Could not parse fields from model reply: {e}");
            FieldsResponse {
                fields: Vec::new(),
                error: Some("parse_failed".to_string()),
            }
        }
    }
}
