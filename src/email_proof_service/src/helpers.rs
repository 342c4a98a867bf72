use std::sync::Arc;

use email_proof_adapters::{
    EmailProofSetting, HashMapProofCache, RandomCodeGenerator, RedisProofCache, RedisSetting,
    SystemClock,
};
use email_proof_application::{CacheProofCodeStore, StoreOptions};
use email_proof_core::Clock;
use redis::{Client, RedisResult};
use secrecy::ExposeSecret;
use tokio::sync::RwLock;

use crate::{InMemoryProofCodeStore, RedisProofCodeStore};

/// Create a Redis client
///
/// # Arguments
/// * `redis_url` - Full connection URL, e.g. `redis://127.0.0.1/`
pub fn get_redis_client(redis_url: &str) -> RedisResult<Client> {
    redis::Client::open(redis_url)
}

/// Open a Redis connection from the `redis` settings section
pub fn configure_redis(setting: &RedisSetting) -> RedisResult<redis::Connection> {
    get_redis_client(setting.url().expose_secret())?.get_connection()
}

/// Build a Redis-backed proof-code store from loaded settings
///
/// # Errors
/// Returns the Redis error if the connection cannot be established
pub fn redis_proof_code_store(setting: &EmailProofSetting) -> RedisResult<RedisProofCodeStore> {
    let conn = configure_redis(&setting.redis)?;
    tracing::info!("Connected to Redis at {}", setting.redis.host_name);

    Ok(CacheProofCodeStore::new(
        RedisProofCache::new(Arc::new(RwLock::new(conn))),
        RandomCodeGenerator::new(),
        SystemClock::new(),
        setting.store.to_options(),
    ))
}

/// Build a process-local store on the system clock
pub fn in_memory_proof_code_store(options: StoreOptions) -> InMemoryProofCodeStore {
    in_memory_proof_code_store_with_clock(SystemClock::new(), options)
}

/// Build a process-local store whose cache and store share `clock`
pub fn in_memory_proof_code_store_with_clock<K>(
    clock: K,
    options: StoreOptions,
) -> InMemoryProofCodeStore<K>
where
    K: Clock + Clone,
{
    CacheProofCodeStore::new(
        HashMapProofCache::with_clock(clock.clone()),
        RandomCodeGenerator::new(),
        clock,
        options,
    )
}
