use std::sync::Arc;
use std::time::Duration;

use crate::application::{bounded, require};
use crate::cache::CacheStore;
use crate::error::AppError;

/// 通用键值透传
///
/// 与用户集合缓存、数据库都没有关系，写入原样保存，没有过期时间。
#[derive(Clone)]
pub struct KvService {
    cache: Arc<dyn CacheStore>,
    timeout: Duration,
}

impl KvService {
    pub fn new(cache: Arc<dyn CacheStore>, timeout: Duration) -> Self {
        Self { cache, timeout }
    }

    pub async fn set_string(&self, key: &str, value: &str) -> Result<(), AppError> {
        let key = require("key", key)?;
        let value = require("value", value)?;

        bounded(
            self.timeout,
            "cache set",
            self.cache.set(key, value.as_bytes(), None),
        )
        .await
    }

    pub async fn get_string(&self, key: &str) -> Result<String, AppError> {
        let key = require("key", key)?;

        let value = bounded(self.timeout, "cache get", self.cache.get(key))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("key {key}")))?;

        Ok(String::from_utf8_lossy(&value).into_owned())
    }

    /// 追加而不是替换
    pub async fn push_list(&self, key: &str, values: &[String]) -> Result<(), AppError> {
        let key = require("key", key)?;
        if values.is_empty() {
            return Err(AppError::MissingField("value"));
        }

        bounded(self.timeout, "cache rpush", self.cache.push_list(key, values)).await
    }

    pub async fn range_list(&self, key: &str) -> Result<Vec<String>, AppError> {
        let key = require("key", key)?;
        bounded(self.timeout, "cache lrange", self.cache.range_list(key)).await
    }

    pub async fn set_hash_field(&self, key: &str, field: &str, value: &str) -> Result<(), AppError> {
        let key = require("key", key)?;
        let field = require("field", field)?;
        let value = require("value", value)?;

        bounded(
            self.timeout,
            "cache hset",
            self.cache.set_hash_field(key, field, value),
        )
        .await
    }

    pub async fn get_hash_field(&self, key: &str, field: &str) -> Result<String, AppError> {
        let key = require("key", key)?;
        let field = require("field", field)?;

        bounded(
            self.timeout,
            "cache hget",
            self.cache.get_hash_field(key, field),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("field {field} in key {key}")))
    }
}
