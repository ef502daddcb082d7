//! FILENAME: core/store/src/object.rs
//! Object storage for downloadable documents.

use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

use rustc_hash::FxHashMap;

use crate::error::StoreError;

/// Bucketed binary objects addressed by key.
pub trait ObjectStore: Send + Sync {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;
    fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;
}

fn no_such_key(bucket: &str, key: &str) -> StoreError {
    StoreError::NoSuchKey {
        bucket: bucket.to_string(),
        key: key.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<FxHashMap<(String, String), Vec<u8>>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let objects = self.objects.read().map_err(|_| StoreError::LockPoisoned)?;
        objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| no_such_key(bucket, key))
    }

    fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let mut objects = self.objects.write().map_err(|_| StoreError::LockPoisoned)?;
        objects.insert((bucket.to_string(), key.to_string()), bytes);
        Ok(())
    }
}

/// Objects stored as files: `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsObjectStore { root: root.into() }
    }

    /// Resolves a key inside its bucket directory. Keys that would escape
    /// the bucket (absolute, `..`) do not exist.
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes || bucket.is_empty() || bucket.contains(['/', '\\']) {
            return Err(no_such_key(bucket, key));
        }
        Ok(self.root.join(bucket).join(relative))
    }
}

impl ObjectStore for FsObjectStore {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(bucket, key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(no_such_key(bucket, key)),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
