// Shared prompt fragments used by every feature.
// Feature-specific templates live in admissions/prompts.rs.

use serde_json::Value;
use tracing::warn;

use crate::storage::{keys, KeyValueStore};

/// Counselor persona prepended to every prompt unless the student saved their own.
pub const DEFAULT_PERSONALITY: &str = "\
You are a realistic and precise college admissions counselor.

Key traits:
- Be honest and direct, not overly praising
- Give actionable, specific feedback
- Keep responses concise (2-4 paragraphs max for most queries)
- Use bullet points for lists
- Acknowledge weaknesses constructively
- Provide realistic assessments based on data
- Act like a professional counselor, not a cheerleader

When giving feedback:
- Start with strengths (1-2 sentences)
- Identify 2-3 specific areas for improvement
- Suggest concrete next steps

When estimating chances:
- Consider holistic factors
- Be realistic about reach/target/safety classifications
- Mention key factors influencing the estimate

Avoid:
- Excessive enthusiasm or generic praise
- Long-winded explanations
- Sugarcoating difficult truths
- Overconfidence in predictions";

/// Returns the saved custom personality if it is a non-blank string, else the default.
/// Store failures fall back to the default rather than failing the request.
pub async fn resolve_personality(store: &dyn KeyValueStore) -> String {
    match store.get(keys::CUSTOM_PERSONALITY).await {
        Ok(Some(Value::String(custom))) if !custom.trim().is_empty() => custom,
        Ok(_) => DEFAULT_PERSONALITY.to_string(),
        Err(e) => {
            warn!("Could not read custom personality: {e}");
            DEFAULT_PERSONALITY.to_string()
        }
    }
}

/// Prefixes a feature prompt with the personality.
pub fn with_personality(personality: &str, prompt: &str) -> String {
    format!("{personality}\n\n{prompt}")
}
