use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 用户数据库实体
///
/// `id` 由数据库自增分配，创建后不再变化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserEntity {
    pub id: i32,
    pub username: String,
    pub email: String,
}
