use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde_json::Value;
use tracing::info;

use super::{validate_key, KeyValueStore, StoreError};

const KEY_PREFIX: &str = "unibro:";

/// Redis-backed store. Values are stored as JSON strings under `unibro:<key>`.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis store connected");
        Ok(Self { conn })
    }
}

fn prefixed(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        validate_key(key)?;
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(prefixed(key)).await?;
        raw.map(|s| serde_json::from_str(&s))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        validate_key(key)?;
        let mut conn = self.conn.clone();
        let raw = serde_json::to_string(&value)?;
        conn.set::<_, _, ()>(prefixed(key), raw).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        let mut conn = self.conn.clone();
        let removed: i64 = conn.del(prefixed(key)).await?;
        Ok(removed > 0)
    }
}
