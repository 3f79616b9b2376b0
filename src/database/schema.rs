use sqlx::PgPool;

/// 启动时建表，表已存在时不做任何改动
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            username VARCHAR(50) NOT NULL,
            email VARCHAR(50) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("users table is ready");
    Ok(())
}
