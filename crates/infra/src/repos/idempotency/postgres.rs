use super::IIdempotencyRepo;
use sqlx::PgPool;

pub struct PostgresIdempotencyRepo {
    pool: PgPool,
}

impl PostgresIdempotencyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl IIdempotencyRepo for PostgresIdempotencyRepo {
    async fn check_and_set(&self, key: &str, ttl_millis: i64, now: i64) -> anyhow::Result<bool> {
        // An expired row is taken over, a live one makes the upsert a no-op
        let claimed: Option<(String,)> = sqlx::query_as(
            r#"
            INSERT INTO idempotency_keys(key, expires_at)
            VALUES($1, $2)
            ON CONFLICT (key) DO UPDATE
            SET expires_at = EXCLUDED.expires_at
            WHERE idempotency_keys.expires_at <= $3
            RETURNING key
            "#,
        )
        .bind(key)
        .bind(now + ttl_millis)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(claimed.is_some())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM idempotency_keys
            WHERE key = $1
            "#,
        )
        .bind(key)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
