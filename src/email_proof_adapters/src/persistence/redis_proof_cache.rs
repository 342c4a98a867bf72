use std::sync::Arc;
use std::time::Duration;

use email_proof_core::{ProofCache, ProofCacheError};
use redis::{Commands, Connection, RedisError};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct RedisProofCache {
    conn: Arc<RwLock<Connection>>,
}

impl RedisProofCache {
    pub fn new(conn: Arc<RwLock<Connection>>) -> Self {
        Self { conn }
    }
}

fn backend_error(e: RedisError) -> ProofCacheError {
    ProofCacheError::BackendError(e.to_string())
}

// SET EX rejects a zero expiry, so sub-second TTLs round up to one second.
fn ttl_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait::async_trait]
impl ProofCache for RedisProofCache {
    async fn get(&self, key: &str) -> Result<Option<String>, ProofCacheError> {
        let mut conn = self.conn.write().await;
        conn.get(key).map_err(backend_error)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), ProofCacheError> {
        let mut conn = self.conn.write().await;
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds(ttl))
            .map_err(backend_error)
    }

    async fn delete(&self, key: &str) -> Result<(), ProofCacheError> {
        let mut conn = self.conn.write().await;
        conn.del::<_, ()>(key).map_err(backend_error)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, ProofCacheError> {
        let pattern = format!("{}*", escape_glob(prefix));
        let mut conn = self.conn.write().await;
        conn.keys(pattern).map_err(backend_error)
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        replacement: Option<&str>,
        ttl: Duration,
    ) -> Result<bool, ProofCacheError> {
        let mut conn = self.conn.write().await;

        redis::cmd("WATCH")
            .arg(key)
            .query::<()>(&mut *conn)
            .map_err(backend_error)?;

        let current: Option<String> = conn.get(key).map_err(backend_error)?;
        if current.as_deref() != expected {
            redis::cmd("UNWATCH")
                .query::<()>(&mut *conn)
                .map_err(backend_error)?;
            return Ok(false);
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        match replacement {
            Some(value) => pipe.set_ex(key, value, ttl_seconds(ttl)).ignore(),
            None => pipe.del(key).ignore(),
        };

        // EXEC answers nil when a watched key changed in the meantime.
        let committed: Option<()> = pipe.query(&mut *conn).map_err(backend_error)?;
        Ok(committed.is_some())
    }
}

/// Escapes the glob metacharacters understood by `KEYS`.
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
