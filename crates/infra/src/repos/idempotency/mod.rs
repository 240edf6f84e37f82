mod inmemory;
mod postgres;

pub use inmemory::InMemoryIdempotencyRepo;
pub use postgres::PostgresIdempotencyRepo;

/// Expiring set of keys of operations that have already been performed
#[async_trait::async_trait]
pub trait IIdempotencyRepo: Send + Sync {
    /// Claims `key` for `ttl_millis`. Returns `true` if the caller got the key
    /// and `false` if an unexpired claim already exists.
    async fn check_and_set(&self, key: &str, ttl_millis: i64, now: i64) -> anyhow::Result<bool>;
    /// Releases a claim so the operation can be retried
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
