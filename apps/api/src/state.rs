use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::media::TtsClient;
use crate::storage::KeyValueStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Gemini when a key is configured, otherwise the mock generator.
    pub llm: Arc<dyn TextGenerator>,
    pub tts: TtsClient,
    /// Redis when `REDIS_URL` is set, otherwise in-memory.
    pub store: Arc<dyn KeyValueStore>,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    /// Mock generator, in-memory store, no TTS key.
    pub fn for_tests() -> Self {
        let config = Config::for_tests();
        Self {
            llm: Arc::new(crate::llm_client::MockGenerator),
            tts: TtsClient::new(None, config.elevenlabs_voice_id.clone())
                .expect("HTTP client builds"),
            store: Arc::new(crate::storage::MemoryStore::new()),
            config,
        }
    }
}
