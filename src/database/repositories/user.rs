use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::{StoreError, UserEntity, UserStore};

/// 用户存储库 Postgres 实现
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn query_all_users(&self) -> Result<Vec<UserEntity>, StoreError> {
        // 不加 ORDER BY，顺序由数据库决定
        let users = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, email
            FROM users
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn insert_user(&self, username: &str, email: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email)
            VALUES ($1, $2)
            "#,
        )
        .bind(username)
        .bind(email)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!("Created user: {}", username);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to create user {}: {:?}", username, e);
                Err(e.into())
            }
        }
    }

    async fn update_user_email(&self, username: &str, email: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $1
            WHERE username = $2
            "#,
        )
        .bind(email)
        .bind(username)
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            "Updated email for {}: {} row(s) affected",
            username,
            result.rows_affected()
        );
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            "Deleted user {}: {} row(s) affected",
            username,
            result.rows_affected()
        );
        Ok(())
    }
}
