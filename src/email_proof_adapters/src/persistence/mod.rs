pub mod hashmap_proof_cache;
pub mod redis_proof_cache;

pub use hashmap_proof_cache::HashMapProofCache;
pub use redis_proof_cache::RedisProofCache;
