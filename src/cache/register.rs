use crate::cache::traits::ObjectCache;
use crate::errors::{InstituteError, Result};
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};
use tracing::warn;

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

const FALLBACK_CACHE: &str = "moka";

static OBJECT_CACHE_REGISTRY: Lazy<RwLock<HashMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    if let Ok(mut registry) = OBJECT_CACHE_REGISTRY.write() {
        registry.insert(name.into(), constructor);
    }
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY
        .read()
        .ok()
        .and_then(|registry| registry.get(name).cloned())
}

pub fn registered_cache_names() -> Vec<String> {
    OBJECT_CACHE_REGISTRY
        .read()
        .map(|registry| registry.keys().cloned().collect())
        .unwrap_or_default()
}

/// 按名字构建缓存，失败时回退到内存缓存
pub async fn build_object_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    if let Some(constructor) = get_object_cache_plugin(name) {
        match constructor().await {
            Ok(cache) => return Ok(Arc::from(cache)),
            Err(e) => warn!("Failed to create {} cache: {}", name, e),
        }
    } else {
        warn!("Cache backend '{}' not found in registry", name);
    }

    if name != FALLBACK_CACHE
        && let Some(constructor) = get_object_cache_plugin(FALLBACK_CACHE)
    {
        warn!("Falling back to {} cache", FALLBACK_CACHE);
        return constructor().await.map(Arc::from);
    }

    Err(InstituteError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {name})"
    )))
}
