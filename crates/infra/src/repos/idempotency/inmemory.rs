use super::IIdempotencyRepo;
use std::collections::HashMap;
use std::sync::Mutex;

pub struct InMemoryIdempotencyRepo {
    /// Key to expiry timestamp
    keys: Mutex<HashMap<String, i64>>,
}

impl InMemoryIdempotencyRepo {
    pub fn new() -> Self {
        Self {
            keys: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl IIdempotencyRepo for InMemoryIdempotencyRepo {
    async fn check_and_set(&self, key: &str, ttl_millis: i64, now: i64) -> anyhow::Result<bool> {
        let mut keys = self.keys.lock().unwrap();
        match keys.get(key) {
            Some(expires_at) if *expires_at > now => Ok(false),
            _ => {
                keys.insert(key.to_string(), now + ttl_millis);
                Ok(true)
            }
        }
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.keys.lock().unwrap().remove(key);
        Ok(())
    }
}
