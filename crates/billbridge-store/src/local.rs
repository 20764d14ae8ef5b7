use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{ObjectStore, StoreConfig, StoreError};

pub struct LocalStore {
    base_dir: PathBuf,
}

impl LocalStore {
    pub fn new(config: &StoreConfig) -> Self {
        let base_dir = config
            .local_data_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }
}

/// Reproduce the same default data directory logic as
/// `billbridge_db::default_data_dir()` without taking a dependency on the db
/// crate.
fn default_data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("billbridge")
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError> {
        let path = self.resolve(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Internal(format!("mkdir: {e}")))?;
        }
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| StoreError::Internal(format!("write {}: {e}", path.display())))
    }

    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        let path = self.resolve(key);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(StoreError::Internal(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.resolve(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Internal(format!(
                "delete {}: {e}",
                path.display()
            ))),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.resolve(prefix);
        if !dir.exists() {
            return Ok(vec![]);
        }
        let mut keys = Vec::new();
        let mut stack = vec![dir];
        while let Some(current) = stack.pop() {
            let mut entries = match tokio::fs::read_dir(&current).await {
                Ok(e) => e,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(StoreError::Internal(format!(
                        "list {}: {e}",
                        current.display()
                    )))
                }
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StoreError::Internal(format!("read_dir entry: {e}")))?
            {
                let path = entry.path();
                let ft = entry
                    .file_type()
                    .await
                    .map_err(|e| StoreError::Internal(format!("file_type: {e}")))?;
                if ft.is_dir() {
                    stack.push(path);
                } else {
                    // Produce a key relative to base_dir
                    if let Ok(rel) = path.strip_prefix(&self.base_dir) {
                        keys.push(rel.to_string_lossy().to_string());
                    }
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.resolve(key);
        match tokio::fs::try_exists(&path).await {
            Ok(exists) => Ok(exists),
            Err(e) => Err(StoreError::Internal(format!(
                "exists {}: {e}",
                path.display()
            ))),
        }
    }
}
