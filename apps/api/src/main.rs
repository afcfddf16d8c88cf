mod admissions;
mod config;
mod errors;
mod llm_client;
mod media;
mod parsing;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{GeminiClient, MockGenerator, TextGenerator};
use crate::media::TtsClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{KeyValueStore, MemoryStore, RedisStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting UniBro API v{}", env!("CARGO_PKG_VERSION"));

    // Text generation: Gemini if keyed, canned replies otherwise
    let llm: Arc<dyn TextGenerator> = match &config.gemini_api_key {
        Some(key) => {
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(GeminiClient::new(key.clone())?)
        }
        None => {
            warn!("GOOGLE_GEMINI_API_KEY not set; using mock replies");
            Arc::new(MockGenerator)
        }
    };

    let tts = TtsClient::new(
        config.elevenlabs_api_key.clone(),
        config.elevenlabs_voice_id.clone(),
    )?;
    if config.elevenlabs_api_key.is_none() {
        info!("ELEVENLABS_API_KEY not set; TTS requires a per-request key");
    }

    let store: Arc<dyn KeyValueStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisStore::connect(url).await?),
        None => {
            info!("REDIS_URL not set; student state is kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState {
        llm,
        tts,
        store,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
