use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient, aio::MultiplexedConnection};

use crate::cache::{CacheError, CacheStore};

/// Redis 缓存适配器
///
/// 持有客户端，每次调用重新获取多路复用连接，Redis 重启或断线后
/// 下一次调用即可恢复。
#[derive(Clone)]
pub struct RedisCache {
    client: Arc<RedisClient>,
}

impl RedisCache {
    /// 创建客户端并用 PING 验证 Redis 可用
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let cache = Self {
            client: Arc::new(RedisClient::open(redis_url)?),
        };

        let mut conn = cache.connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        tracing::info!("Connected to Redis: {}", pong);

        Ok(cache)
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.connection().await?;
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        match ttl {
            // SET EX 不接受 0 秒
            Some(ttl) => {
                let secs = ttl.as_secs().max(1);
                let _: () = conn.set_ex(key, value, secs).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn push_list(&self, key: &str, values: &[String]) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: i64 = conn.rpush(key, values).await?;
        Ok(())
    }

    async fn range_list(&self, key: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.connection().await?;
        let values: Vec<String> = conn.lrange(key, 0, -1).await?;
        Ok(values)
    }

    async fn set_hash_field(&self, key: &str, field: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _: i64 = conn.hset(key, field, value).await?;
        Ok(())
    }

    async fn get_hash_field(&self, key: &str, field: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.hget(key, field).await?;
        Ok(value)
    }
}
