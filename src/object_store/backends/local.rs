use actix_web::web::Bytes;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::declare_object_store_plugin;
use crate::errors::{PortalError, Result};
use crate::object_store::{ObjectStore, StoredObject, is_valid_key, public_url};

declare_object_store_plugin!("local", LocalObjectStore);

/// 本地文件系统对象存储，对象保存在 `upload.dir` 下
pub struct LocalObjectStore {
    root: PathBuf,
    base_url: String,
}

impl LocalObjectStore {
    pub async fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            PortalError::object_store(format!(
                "Failed to create upload directory {}: {e}",
                root.display()
            ))
        })?;
        Ok(Self {
            root,
            base_url: base_url.into(),
        })
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let store = Self::new(
            &config.upload.dir,
            config.object_store.public_base_url.clone(),
        )
        .await?;
        debug!("LocalObjectStore initialized at {}", store.root.display());
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(PortalError::object_store(format!("Invalid object key: {key}")));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> Result<StoredObject> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortalError::object_store(format!("Failed to create directory: {e}")))?;
        }
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| PortalError::object_store(format!("Failed to write object {key}: {e}")))?;

        Ok(StoredObject {
            key: key.to_string(),
            url: public_url(&self.base_url, key),
        })
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let path = self.object_path(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortalError::object_store(format!(
                "Failed to read object {key}: {e}"
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.object_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Object {} already absent on delete", key);
                Ok(())
            }
            Err(e) => Err(PortalError::object_store(format!(
                "Failed to delete object {key}: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_objects_are_written_under_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalObjectStore::new(dir.path(), "http://localhost:8080")
            .await
            .expect("store");

        let stored = store
            .put("assignments/7-x.zip", Bytes::from_static(b"PK\x03\x04data"), "application/zip")
            .await
            .expect("put");

        assert_eq!(stored.key, "assignments/7-x.zip");
        assert_eq!(stored.url, "http://localhost:8080/files/assignments/7-x.zip");
        assert!(dir.path().join("assignments/7-x.zip").exists());

        let data = store.get("assignments/7-x.zip").await.unwrap();
        assert_eq!(data.as_deref(), Some(&b"PK\x03\x04data"[..]));
    }

    #[actix_web::test]
    async fn test_missing_object_and_delete() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalObjectStore::new(dir.path(), "http://localhost:8080")
            .await
            .expect("store");

        assert!(store.get("assignments/none.zip").await.unwrap().is_none());
        store.delete("assignments/none.zip").await.unwrap();

        store
            .put("assignments/gone.zip", Bytes::from_static(b"PK"), "application/zip")
            .await
            .unwrap();
        store.delete("assignments/gone.zip").await.unwrap();
        assert!(!dir.path().join("assignments/gone.zip").exists());
    }

    #[actix_web::test]
    async fn test_traversal_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalObjectStore::new(dir.path(), "http://localhost:8080")
            .await
            .expect("store");

        assert!(store.get("../outside.zip").await.is_err());
        assert!(
            store
                .put("/abs.zip", Bytes::new(), "application/zip")
                .await
                .is_err()
        );
    }
}
