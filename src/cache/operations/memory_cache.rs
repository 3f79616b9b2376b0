use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::{CacheError, CacheStore};

#[derive(Debug, Clone)]
enum Value {
    Bytes(Vec<u8>),
    List(Vec<String>),
    Hash(HashMap<String, String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// 进程内缓存
///
/// 未配置 Redis 时使用。过期在读取时惰性清理，类型不匹配时的行为与 Redis 的
/// WRONGTYPE 一致。
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取出未过期的条目，已过期的顺手删除
    fn live_entry<'a>(
        entries: &'a mut HashMap<String, Entry>,
        key: &str,
    ) -> Option<&'a mut Entry> {
        let now = Instant::now();
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut entries = self.entries.write().await;
        match Self::live_entry(&mut entries, key) {
            Some(Entry {
                value: Value::Bytes(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CacheError> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        let mut entries = self.entries.write().await;
        // SET 会覆盖任何类型的旧值
        entries.insert(
            key.to_string(),
            Entry {
                value: Value::Bytes(value.to_vec()),
                expires_at,
            },
        );
        Ok(())
    }

    async fn push_list(&self, key: &str, values: &[String]) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        match Self::live_entry(&mut entries, key) {
            Some(Entry {
                value: Value::List(list),
                ..
            }) => {
                list.extend(values.iter().cloned());
                Ok(())
            }
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => {
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: Value::List(values.to_vec()),
                        expires_at: None,
                    },
                );
                Ok(())
            }
        }
    }

    async fn range_list(&self, key: &str) -> Result<Vec<String>, CacheError> {
        let mut entries = self.entries.write().await;
        match Self::live_entry(&mut entries, key) {
            Some(Entry {
                value: Value::List(list),
                ..
            }) => Ok(list.clone()),
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn set_hash_field(&self, key: &str, field: &str, value: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().await;
        match Self::live_entry(&mut entries, key) {
            Some(Entry {
                value: Value::Hash(hash),
                ..
            }) => {
                hash.insert(field.to_string(), value.to_string());
                Ok(())
            }
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => {
                let hash = HashMap::from([(field.to_string(), value.to_string())]);
                entries.insert(
                    key.to_string(),
                    Entry {
                        value: Value::Hash(hash),
                        expires_at: None,
                    },
                );
                Ok(())
            }
        }
    }

    async fn get_hash_field(&self, key: &str, field: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.write().await;
        match Self::live_entry(&mut entries, key) {
            Some(Entry {
                value: Value::Hash(hash),
                ..
            }) => Ok(hash.get(field).cloned()),
            Some(_) => Err(CacheError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }
}
