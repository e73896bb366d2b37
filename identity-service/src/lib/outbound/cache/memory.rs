use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::identity::errors::CacheError;
use crate::identity::models::Identity;
use crate::identity::ports::SessionCache;

struct Entry {
    identity: Identity,
    expires_at: Instant,
}

/// Process-local session cache.
///
/// Runs on the tokio clock, so paused-time tests can step past the TTL.
/// Expired entries are dropped on read and swept on every write.
#[derive(Default)]
pub struct InMemorySessionCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Unavailable("session cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn get(&self, email: &str) -> Result<Option<Identity>, CacheError> {
        let mut entries = self.lock()?;

        let live = entries
            .get(email)
            .map(|entry| (Instant::now() < entry.expires_at, entry.identity.clone()));

        match live {
            Some((true, identity)) => Ok(Some(identity)),
            Some((false, _)) => {
                entries.remove(email);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        email: &str,
        identity: &Identity,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let now = Instant::now();
        let entry = Entry {
            identity: identity.clone(),
            expires_at: now + ttl,
        };

        let mut entries = self.lock()?;
        entries.retain(|_, existing| existing.expires_at > now);
        entries.insert(email.to_string(), entry);

        Ok(())
    }
}
