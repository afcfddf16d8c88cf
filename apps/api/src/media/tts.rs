//! ElevenLabs text-to-speech client.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io/v1/text-to-speech";
const TTS_MODEL: &str = "eleven_monolingual_v1";
/// "Rachel", the default professional voice.
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("no ElevenLabs API key configured")]
    MissingKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ElevenLabs API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

#[derive(Clone)]
pub struct TtsClient {
    client: Client,
    api_key: Option<String>,
    voice_id: String,
}

impl TtsClient {
    pub fn new(api_key: Option<String>, voice_id: String) -> Result<Self, TtsError> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            api_key,
            voice_id,
        })
    }

    /// A per-request key (from the student's settings) takes precedence over the server key.
    fn resolve_key<'a>(&'a self, override_key: Option<&'a str>) -> Result<&'a str, TtsError> {
        override_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or(self.api_key.as_deref())
            .ok_or(TtsError::MissingKey)
    }

    /// Synthesizes `text` to MPEG audio.
    pub async fn synthesize(&self, text: &str, override_key: Option<&str>) -> Result<Bytes, TtsError> {
        let api_key = self.resolve_key(override_key)?;
        let url = format!("{ELEVENLABS_API_BASE}/{}", self.voice_id);

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", api_key)
            .header("accept", "audio/mpeg")
            .json(&SpeechRequest {
                text,
                model_id: TTS_MODEL,
                voice_settings: VoiceSettings::default(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TtsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response.bytes().await?;
        debug!("TTS produced {} bytes for {} chars", audio.len(), text.len());
        Ok(audio)
    }
}
