use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::models::{PendingVerification, RegistrationPayload};

/// 挂起验证码的内存存储，按目标地址（邮箱或手机号）索引。
///
/// 克隆的实例共享同一张表；过期不做后台清扫，由读取方惰性判断。
#[derive(Clone)]
pub struct CodeStore {
    entries: Arc<RwLock<HashMap<String, PendingVerification>>>,
}

impl CodeStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 写入验证码，无条件覆盖同一地址的旧条目（重发即覆盖，有效期重新计时）
    pub async fn put(&self, destination: &str, code: String, ttl: Duration, payload: RegistrationPayload) {
        let entry = PendingVerification {
            code,
            expires_at: Utc::now() + ttl,
            payload,
        };
        let mut entries = self.entries.write().await;
        entries.insert(destination.to_string(), entry);
    }

    /// 纯查询，不触发过期删除
    pub async fn get(&self, destination: &str) -> Option<PendingVerification> {
        let entries = self.entries.read().await;
        entries.get(destination).cloned()
    }

    /// 幂等删除
    pub async fn remove(&self, destination: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(destination);
    }
}

impl Default for CodeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(to: &str) -> RegistrationPayload {
        RegistrationPayload {
            username: "bob".to_string(),
            password: "secret1".to_string(),
            to: to.to_string(),
        }
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_entry() {
        let store = CodeStore::new();
        store
            .put("a@x.com", "111111".to_string(), Duration::seconds(600), payload("a@x.com"))
            .await;
        store
            .put("a@x.com", "222222".to_string(), Duration::seconds(600), payload("a@x.com"))
            .await;

        let entry = store.get("a@x.com").await.unwrap();
        assert_eq!(entry.code, "222222");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = CodeStore::new();
        assert!(store.get("nobody@x.com").await.is_none());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = CodeStore::new();
        store
            .put("a@x.com", "111111".to_string(), Duration::seconds(600), payload("a@x.com"))
            .await;
        store.remove("a@x.com").await;
        store.remove("a@x.com").await;
        assert!(store.get("a@x.com").await.is_none());
    }

    #[tokio::test]
    async fn test_negative_ttl_entry_reads_as_expired() {
        let store = CodeStore::new();
        store
            .put("a@x.com", "111111".to_string(), Duration::seconds(-1), payload("a@x.com"))
            .await;
        let entry = store.get("a@x.com").await.unwrap();
        assert!(entry.is_expired(Utc::now()));
    }
}
