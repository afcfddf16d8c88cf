//! Key/value persistence for student state (profile, college percents, plan).
//!
//! `AppState` holds an `Arc<dyn KeyValueStore>`: `MemoryStore` by default,
//! `RedisStore` when `REDIS_URL` is configured. Parsers never touch the store;
//! handlers read and write it explicitly.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

pub mod handlers;
pub mod redis_store;

pub use redis_store::RedisStore;

const MAX_KEY_LEN: usize = 200;

/// Well-known keys shared with the web client.
pub mod keys {
    pub const CUSTOM_PERSONALITY: &str = "customPersonality";
    pub const PLAN_END_DATE: &str = "plan.endDate";
    pub const PLAN_TABLE: &str = "plan.table";

    pub fn college_percent(college_id: &str) -> String {
        format!("college.{college_id}.percent")
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid key '{0}'")]
    InvalidKey(String),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("stored value is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Returns whether a value was present.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;
}

/// Keys must be non-empty, at most 200 chars, and free of whitespace.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() || key.chars().count() > MAX_KEY_LEN || key.chars().any(char::is_whitespace) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Process-local store. State is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        validate_key(key)?;
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        validate_key(key)?;
        self.values.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        Ok(self.values.write().await.remove(key).is_some())
    }
}
