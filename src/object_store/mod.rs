//! 对象存储
//!
//! 作业压缩包的字节内容保存在对象存储中，数据库只保存对象的 URL 与 key。
//! 后端通过名称注册，启动时按 `object_store.backend` 选择。

use actix_web::web::Bytes;
use async_trait::async_trait;

use crate::errors::Result;

pub mod backends;
pub mod register;

pub use register::{
    ObjectStoreConstructor, build_object_store, debug_object_store_registry,
    get_object_store_plugin, register_object_store_plugin,
};

/// 写入成功后返回的对象位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 写入对象，同名 key 会被覆盖
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<StoredObject>;
    /// 读取对象；不存在时返回 `Ok(None)`
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;
    /// 删除对象；不存在视为成功
    async fn delete(&self, key: &str) -> Result<()>;
}

/// 生成作业对象的 key：`assignments/{unix_ts}-{uuid}{ext}`
pub fn generate_assignment_key(extension: &str) -> String {
    format!(
        "assignments/{}-{}{}",
        chrono::Utc::now().timestamp(),
        uuid::Uuid::new_v4(),
        extension
    )
}

/// 对象的公开访问地址
pub fn public_url(base_url: &str, key: &str) -> String {
    format!("{}/files/{}", base_url.trim_end_matches('/'), key)
}

/// key 只能由普通路径段组成，不允许 `..`、空段或绝对路径
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('/')
        && !key.contains('\\')
        && key
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_key_shape() {
        let key = generate_assignment_key(".zip");
        assert!(key.starts_with("assignments/"));
        assert!(key.ends_with(".zip"));
        assert!(is_valid_key(&key));
        assert_ne!(key, generate_assignment_key(".zip"));
    }

    #[test]
    fn test_public_url_joins_base() {
        assert_eq!(
            public_url("http://localhost:8080/", "assignments/a.zip"),
            "http://localhost:8080/files/assignments/a.zip"
        );
    }

    #[test]
    fn test_key_validation() {
        assert!(is_valid_key("assignments/1-abc.zip"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("/etc/passwd"));
        assert!(!is_valid_key("assignments/../secret"));
        assert!(!is_valid_key("assignments//a.zip"));
        assert!(!is_valid_key("a\\b"));
    }
}
