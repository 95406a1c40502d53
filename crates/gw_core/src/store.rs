use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::Result;

/// Durable key-value persistence for pipeline artifacts, keyed by relative
/// path. Writes create parent directories; reads of missing paths return
/// `Ok(None)` rather than erroring.
#[async_trait]
pub trait Store: Send + Sync {
    async fn read_json(&self, path: &str) -> Result<Option<Value>>;

    async fn write_json(&self, path: &str, value: &Value) -> Result<()>;

    async fn read_text(&self, path: &str) -> Result<Option<String>>;

    async fn write_text(&self, path: &str, contents: &str) -> Result<()>;
}

/// Typed convenience wrappers over the object-safe `Store` surface.
pub struct TypedStore;

impl TypedStore {
    pub async fn read<T: DeserializeOwned>(store: &dyn Store, path: &str) -> Result<Option<T>> {
        match store.read_json(path).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn write<T: Serialize>(store: &dyn Store, path: &str, value: &T) -> Result<()> {
        store.write_json(path, &serde_json::to_value(value)?).await
    }
}
