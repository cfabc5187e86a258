use actix_web::web::Bytes;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::config::AppConfig;
use crate::declare_object_store_plugin;
use crate::errors::{PortalError, Result};
use crate::object_store::{ObjectStore, StoredObject, is_valid_key, public_url};

declare_object_store_plugin!("memory", MemoryObjectStore);

/// 进程内对象存储，进程退出即丢失
pub struct MemoryObjectStore {
    base_url: String,
    objects: DashMap<String, Bytes>,
}

impl MemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: DashMap::new(),
        }
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        debug!("MemoryObjectStore initialized");
        Ok(Self::new(config.object_store.public_base_url.clone()))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> Result<StoredObject> {
        if !is_valid_key(key) {
            return Err(PortalError::object_store(format!("Invalid object key: {key}")));
        }
        self.objects.insert(key.to_string(), data);
        Ok(StoredObject {
            key: key.to_string(),
            url: public_url(&self.base_url, key),
        })
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.objects.get(key).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_put_get_delete() {
        let store = MemoryObjectStore::new("http://files.test");
        let stored = store
            .put("assignments/1-a.zip", Bytes::from_static(b"PK\x03\x04"), "application/zip")
            .await
            .expect("put should succeed");

        assert_eq!(stored.url, "http://files.test/files/assignments/1-a.zip");
        assert_eq!(
            store.get("assignments/1-a.zip").await.unwrap(),
            Some(Bytes::from_static(b"PK\x03\x04"))
        );

        store.delete("assignments/1-a.zip").await.unwrap();
        assert!(store.get("assignments/1-a.zip").await.unwrap().is_none());
        // 重复删除不报错
        store.delete("assignments/1-a.zip").await.unwrap();
        assert!(store.is_empty());
    }

    #[actix_web::test]
    async fn test_rejects_traversal_key() {
        let store = MemoryObjectStore::new("http://files.test");
        assert!(
            store
                .put("../escape.zip", Bytes::new(), "application/zip")
                .await
                .is_err()
        );
    }
}
