use async_trait::async_trait;

use super::{LlmError, TextGenerator};

/// Deterministic stand-in used when no Gemini key is configured, so every
/// feature still returns something parseable during local development.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGenerator;

const MOCK_CHANCE: &str = "72";

const MOCK_ESSAY_FEEDBACK: &str = "\
• Strong voice and authenticity
• Add 1 vivid anecdote to ground the theme
• Tighter conclusion that echoes the opener
• Replace generalities with specifics (names, numbers)
• Trim 5–8% for concision";

const MOCK_PLAN: &str = "\
2025-10-01: Take SAT mock
2025-11-10: Attend local hackathon
2025-12-01: Submit EA applications";

const MOCK_FIELDS: &str = r#"[{"id":"why-us","label":"Why this college?","type":"textarea","optional":false}]"#;

const MOCK_FALLBACK: &str =
    "This is a placeholder response. Add GOOGLE_GEMINI_API_KEY to use real AI.";

impl MockGenerator {
    fn reply_for(prompt: &str) -> &'static str {
        let prompt = prompt.to_lowercase();
        // Match on phrases unique to each prompt template; the personality
        // preamble shared by all of them mentions chances and feedback.
        if prompt.contains("admission probability") {
            MOCK_CHANCE
        } else if prompt.contains("json array of fields") {
            MOCK_FIELDS
        } else if prompt.contains("essay:") {
            MOCK_ESSAY_FEEDBACK
        } else if prompt.contains("admissions plan") {
            MOCK_PLAN
        } else {
            MOCK_FALLBACK
        }
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        Ok(Self::reply_for(prompt).to_string())
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}
