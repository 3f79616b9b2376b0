// 数据库模块
// 包含用户实体定义、存储适配器接口和 Postgres 实现

use async_trait::async_trait;
use thiserror::Error;

pub mod models;
pub mod repositories;
pub mod schema;

pub use models::user::UserEntity;
pub use repositories::user::PgUserRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// 用户存储适配器
///
/// 只负责对 users 表执行增删改查，不感知缓存。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 按存储自然顺序返回全部用户
    async fn query_all_users(&self) -> Result<Vec<UserEntity>, StoreError>;

    async fn insert_user(&self, username: &str, email: &str) -> Result<(), StoreError>;

    async fn update_user_email(&self, username: &str, email: &str) -> Result<(), StoreError>;

    /// 没有匹配的行时同样返回成功
    async fn delete_user(&self, username: &str) -> Result<(), StoreError>;
}
