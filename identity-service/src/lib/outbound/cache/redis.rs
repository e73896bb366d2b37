use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::identity::errors::CacheError;
use crate::identity::models::Identity;
use crate::identity::ports::SessionCache;

/// Session cache backed by Redis.
///
/// Values are JSON identity snapshots stored with `SET EX`, so expiry is
/// enforced by Redis itself.
#[derive(Clone)]
pub struct RedisSessionCache {
    manager: ConnectionManager,
}

impl RedisSessionCache {
    pub async fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| CacheError::Unavailable(format!("Invalid redis URL: {}", e)))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Unavailable(format!("Redis connection failed: {}", e)))?;

        Ok(Self { manager })
    }

    fn key(email: &str) -> String {
        format!("session:{email}")
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn get(&self, email: &str) -> Result<Option<Identity>, CacheError> {
        let mut conn = self.manager.clone();

        let raw: Option<String> = conn
            .get(Self::key(email))
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        raw.map(|value| {
            serde_json::from_str(&value).map_err(|e| CacheError::Serialization(e.to_string()))
        })
        .transpose()
    }

    async fn set(
        &self,
        email: &str,
        identity: &Identity,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let value =
            serde_json::to_string(identity).map_err(|e| CacheError::Serialization(e.to_string()))?;
        // SET EX rejects a zero expiry
        let ttl_secs = ttl.as_secs().max(1);

        let _: () = conn
            .set_ex(Self::key(email), value, ttl_secs)
            .await
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        Ok(())
    }
}
