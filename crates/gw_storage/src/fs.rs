use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gw_core::{Result, Store};
use serde_json::Value;
use tokio::fs;

/// Filesystem-backed artifact store rooted at a content directory. Relative
/// artifact paths from `paths` are resolved under the root; parent
/// directories are created on write.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    async fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for FsStore {
    async fn read_json(&self, path: &str) -> Result<Option<Value>> {
        match self.read_text(path).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn write_json(&self, path: &str, value: &Value) -> Result<()> {
        let mut text = serde_json::to_string_pretty(value)?;
        text.push('\n');
        self.write_text(path, &text).await
    }

    async fn read_text(&self, path: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.resolve(path)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_text(&self, path: &str, contents: &str) -> Result<()> {
        let full = self.resolve(path);
        Self::ensure_parent(&full).await?;
        fs::write(&full, contents).await?;
        tracing::debug!("Wrote {}", full.display());
        Ok(())
    }
}
