use anyhow::{Context, Result};

use crate::media::tts::DEFAULT_VOICE_ID;

/// Application configuration loaded from environment variables.
/// Every provider key is optional: without one the service falls back to
/// mock replies (Gemini) or answers 503 (ElevenLabs).
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: String,
    pub redis_url: Option<String>,
    pub port: u16,
    pub max_upload_mb: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GOOGLE_GEMINI_API_KEY"),
            elevenlabs_api_key: optional_env("ELEVENLABS_API_KEY"),
            elevenlabs_voice_id: optional_env("ELEVENLABS_VOICE_ID")
                .unwrap_or_else(|| DEFAULT_VOICE_ID.to_string()),
            redis_url: optional_env("REDIS_URL"),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_upload_mb: optional_env("MAX_UPLOAD_MB")
                .unwrap_or_else(|| "10".to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a whole number of megabytes")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Unset and blank values are both treated as missing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            gemini_api_key: None,
            elevenlabs_api_key: None,
            elevenlabs_voice_id: DEFAULT_VOICE_ID.to_string(),
            redis_url: None,
            port: 8080,
            max_upload_mb: 10,
            rust_log: "info".to_string(),
        }
    }
}
