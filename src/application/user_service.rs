//! 用户集合的旁路缓存 (cache-aside)
//!
//! 读：先查缓存，命中直接返回缓存里的 JSON；未命中则查库、序列化、回填缓存。
//! 写：先改库，成功后同步重新查询整张表并覆盖缓存（刷新而不是失效）。
//!
//! 写路径上的缓存刷新失败只记录日志，写操作仍然成功；读路径上的回填失败
//! 是否导致请求失败由 [`CacheFillPolicy`] 决定。
//!
//! 改库与刷新缓存之间没有加锁，也没有版本号。并发写入时，刷新完成的先后
//! 决定最终的缓存内容（最后一次刷新生效，而不是最后一次写入生效），缓存
//! 可能停留在较早的快照上，直到过期或下一次写入。

use std::sync::Arc;

use crate::application::{bounded, require};
use crate::cache::CacheStore;
use crate::config::{CacheFillPolicy, CacheSettings};
use crate::database::UserStore;
use crate::error::AppError;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    cache: Arc<dyn CacheStore>,
    settings: CacheSettings,
}

impl UserService {
    pub fn new(
        store: Arc<dyn UserStore>,
        cache: Arc<dyn CacheStore>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            store,
            cache,
            settings,
        }
    }

    /// 返回序列化后的用户集合 (JSON 数组)
    ///
    /// 命中时原样返回缓存内容，不续期，也不与数据库校验。
    pub async fn list_users(&self) -> Result<Vec<u8>, AppError> {
        let key = self.settings.users_key.as_str();

        match bounded(
            self.settings.operation_timeout,
            "cache get",
            self.cache.get(key),
        )
        .await
        {
            Ok(Some(payload)) => {
                tracing::debug!(key, "users cache hit");
                return Ok(payload);
            }
            Ok(None) => tracing::debug!(key, "users cache miss"),
            // 缓存读取出错按未命中处理
            Err(e) => tracing::warn!(key, error = %e, "users cache probe failed, reading store"),
        }

        let payload = self.load_snapshot().await?;

        let fill = bounded(
            self.settings.operation_timeout,
            "cache set",
            self.cache.set(key, &payload, Some(self.settings.fill_ttl)),
        )
        .await;

        if let Err(e) = fill {
            match self.settings.fill_policy {
                CacheFillPolicy::Strict => return Err(e),
                CacheFillPolicy::Lenient => {
                    tracing::warn!(key, error = %e, "failed to populate users cache, serving uncached")
                }
            }
        }

        Ok(payload)
    }

    pub async fn create_user(&self, username: &str, email: &str) -> Result<(), AppError> {
        let username = require("username", username)?;
        let email = require("email", email)?;

        bounded(
            self.settings.operation_timeout,
            "insert user",
            self.store.insert_user(username, email),
        )
        .await?;

        self.refresh_cache().await;
        Ok(())
    }

    pub async fn update_user_email(&self, username: &str, email: &str) -> Result<(), AppError> {
        let username = require("username", username)?;
        let email = require("email", email)?;

        bounded(
            self.settings.operation_timeout,
            "update user",
            self.store.update_user_email(username, email),
        )
        .await?;

        self.refresh_cache().await;
        Ok(())
    }

    /// 删除不存在的用户同样返回成功
    pub async fn delete_user(&self, username: &str) -> Result<(), AppError> {
        let username = require("username", username)?;

        bounded(
            self.settings.operation_timeout,
            "delete user",
            self.store.delete_user(username),
        )
        .await?;

        self.refresh_cache().await;
        Ok(())
    }

    /// 写操作成功后刷新缓存，失败只记日志
    async fn refresh_cache(&self) {
        if let Err(e) = self.try_refresh_cache().await {
            tracing::warn!(
                key = %self.settings.users_key,
                error = %e,
                "failed to refresh users cache after write"
            );
        }
    }

    async fn try_refresh_cache(&self) -> Result<(), AppError> {
        let payload = self.load_snapshot().await?;
        bounded(
            self.settings.operation_timeout,
            "cache set",
            self.cache.set(
                &self.settings.users_key,
                &payload,
                Some(self.settings.refresh_ttl),
            ),
        )
        .await
    }

    async fn load_snapshot(&self) -> Result<Vec<u8>, AppError> {
        let users = bounded(
            self.settings.operation_timeout,
            "query users",
            self.store.query_all_users(),
        )
        .await?;

        Ok(serde_json::to_vec(&users)?)
    }
}
