mod memory_cache;
mod redis_cache;

pub use memory_cache::InMemoryListingCache;
pub use redis_cache::RedisListingCache;
