use std::collections::HashMap;

use async_trait::async_trait;
use gw_core::{Result, Store};
use serde_json::Value;
use tokio::sync::RwLock;

/// In-memory `Store` used by pipeline tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn read_json(&self, path: &str) -> Result<Option<Value>> {
        match self.read_text(path).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn write_json(&self, path: &str, value: &Value) -> Result<()> {
        self.write_text(path, &serde_json::to_string(value)?).await
    }

    async fn read_text(&self, path: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(path).cloned())
    }

    async fn write_text(&self, path: &str, contents: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(path.to_string(), contents.to_string());
        Ok(())
    }
}
