// 缓存模块
// 包含缓存适配器接口以及 Redis / 内存两种实现

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod keys;
pub mod operations;

pub use operations::{MemoryCache, RedisCache};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("key `{0}` holds a value of another type")]
    WrongType(String),
}

/// 缓存适配器
///
/// 同时服务于用户集合缓存和通用的键值透传接口。
/// 实现必须可以被多个请求并发使用。
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 读取字符串值，不存在或已过期时返回 `None`
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// 写入字符串值，`ttl` 为 `None` 时永不过期
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CacheError>;

    /// 追加到列表尾部
    async fn push_list(&self, key: &str, values: &[String]) -> Result<(), CacheError>;

    /// 返回整个列表，键不存在时返回空列表
    async fn range_list(&self, key: &str) -> Result<Vec<String>, CacheError>;

    async fn set_hash_field(&self, key: &str, field: &str, value: &str) -> Result<(), CacheError>;

    async fn get_hash_field(&self, key: &str, field: &str) -> Result<Option<String>, CacheError>;
}
