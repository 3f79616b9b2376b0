/// 缓存适配器实现

// Redis 实现
pub mod redis_cache;

// 进程内实现
pub mod memory_cache;

pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;
