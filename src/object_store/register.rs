use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use crate::object_store::ObjectStore;
use crate::object_store::backends;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedObjectStoreFuture =
    Pin<Box<dyn Future<Output = Result<Arc<dyn ObjectStore>>> + Send>>;
pub type ObjectStoreConstructor =
    Arc<dyn Fn(&AppConfig) -> BoxedObjectStoreFuture + Send + Sync>;

/// 声明一个对象存储插件
///
/// 生成 `plugin_entry()`，返回插件名与构造器；类型需要实现
/// `async fn from_config(&AppConfig) -> Result<Self>`。
#[macro_export]
macro_rules! declare_object_store_plugin {
    ($name:literal, $ty:ty) => {
        pub fn plugin_entry() -> (&'static str, $crate::object_store::ObjectStoreConstructor) {
            let constructor: $crate::object_store::ObjectStoreConstructor = std::sync::Arc::new(
                |config: &$crate::config::AppConfig| -> $crate::object_store::register::BoxedObjectStoreFuture {
                    let config = config.clone();
                    Box::pin(async move {
                        let store = <$ty>::from_config(&config).await?;
                        Ok::<_, $crate::errors::PortalError>(std::sync::Arc::new(store)
                            as std::sync::Arc<dyn $crate::object_store::ObjectStore>)
                    })
                },
            );
            ($name, constructor)
        }
    };
}

// 内置后端在首次访问时注册
static OBJECT_STORE_REGISTRY: Lazy<RwLock<HashMap<String, ObjectStoreConstructor>>> =
    Lazy::new(|| {
        let registry = backends::builtin_plugins()
            .into_iter()
            .map(|(name, constructor)| (name.to_string(), constructor))
            .collect();
        RwLock::new(registry)
    });

pub fn register_object_store_plugin<S: Into<String>>(name: S, constructor: ObjectStoreConstructor) {
    let name = name.into();
    let mut registry = OBJECT_STORE_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.insert(name, constructor);
}

pub fn get_object_store_plugin(name: &str) -> Option<ObjectStoreConstructor> {
    OBJECT_STORE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
        .cloned()
}

/// 按配置中的后端名称构造对象存储
pub async fn build_object_store(config: &AppConfig) -> Result<Arc<dyn ObjectStore>> {
    let backend = config.object_store.backend.as_str();
    let constructor = get_object_store_plugin(backend).ok_or_else(|| {
        PortalError::object_store_plugin_not_found(format!(
            "Object store backend '{backend}' is not registered"
        ))
    })?;
    constructor(config).await
}

pub fn debug_object_store_registry() {
    let registry = OBJECT_STORE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if registry.is_empty() {
        tracing::debug!("No object store plugins registered.");
    } else {
        tracing::debug!("Registered object store plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backends_registered() {
        assert!(get_object_store_plugin("local").is_some());
        assert!(get_object_store_plugin("memory").is_some());
        assert!(get_object_store_plugin("s3").is_none());
    }

    #[actix_web::test]
    async fn test_unknown_backend_is_rejected() {
        let mut config = AppConfig::get().clone();
        config.object_store.backend = "does-not-exist".to_string();

        let err = match build_object_store(&config).await {
            Ok(_) => panic!("unknown backend must not build"),
            Err(err) => err,
        };
        assert_eq!(err.code(), "E009");
    }

    #[actix_web::test]
    async fn test_custom_plugin_can_be_registered() {
        register_object_store_plugin("memory-alias", backends::memory::plugin_entry().1);

        let mut config = AppConfig::get().clone();
        config.object_store.backend = "memory-alias".to_string();
        assert!(build_object_store(&config).await.is_ok());
    }
}
