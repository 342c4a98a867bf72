use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use email_proof_core::{Clock, ProofCache, ProofCacheError};

use crate::clock::SystemClock;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// In-process stand-in for the shared cache. Entries expire against the
/// injected clock, so tests can step over TTLs without sleeping.
#[derive(Clone)]
pub struct HashMapProofCache<K = SystemClock>
where
    K: Clock,
{
    entries: Arc<DashMap<String, CacheEntry>>,
    clock: K,
}

impl HashMapProofCache<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for HashMapProofCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> HashMapProofCache<K>
where
    K: Clock,
{
    pub fn with_clock(clock: K) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            clock,
        }
    }

    fn expiry(&self, ttl: Duration) -> DateTime<Utc> {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        self.clock
            .now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[async_trait::async_trait]
impl<K> ProofCache for HashMapProofCache<K>
where
    K: Clock,
{
    async fn get(&self, key: &str) -> Result<Option<String>, ProofCacheError> {
        let now = self.clock.now();
        let value = self
            .entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone());

        if value.is_none() {
            self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ProofCacheError> {
        let entry = CacheEntry {
            value: value.to_owned(),
            expires_at: self.expiry(ttl),
        };
        self.entries.insert(key.to_owned(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), ProofCacheError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ProofCacheError> {
        let now = self.clock.now();
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix) && entry.value().is_live(now))
            .map(|entry| entry.key().clone())
            .collect())
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        replacement: Option<&str>,
        ttl: Duration,
    ) -> Result<bool, ProofCacheError> {
        let now = self.clock.now();
        let expires_at = self.expiry(ttl);

        // The entry guard holds the shard lock until the swap is done.
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(mut occupied) => {
                let current = Some(occupied.get())
                    .filter(|entry| entry.is_live(now))
                    .map(|entry| entry.value.as_str());
                if current != expected {
                    return Ok(false);
                }
                match replacement {
                    Some(value) => {
                        occupied.insert(CacheEntry {
                            value: value.to_owned(),
                            expires_at,
                        });
                    }
                    None => {
                        occupied.remove();
                    }
                }
            }
            Entry::Vacant(vacant) => {
                if expected.is_some() {
                    return Ok(false);
                }
                if let Some(value) = replacement {
                    vacant.insert(CacheEntry {
                        value: value.to_owned(),
                        expires_at,
                    });
                }
            }
        }
        Ok(true)
    }
}
