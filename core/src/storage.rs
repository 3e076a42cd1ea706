// Upload store - 按内容寻址的上传文件存储
// 对象名 = <sha256><扩展名>，同名即同内容，并发上传不会互相覆盖

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{CoreError, Result};
use crate::scanner::hash::{hash_bytes, hash_file, DEFAULT_CHUNK_SIZE};

/// Where an upload landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub path: PathBuf,
    pub object_name: String,
    pub digest: String,
    /// False when an identical object was already present.
    pub created: bool,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Opens the store, creating the directory when absent.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            CoreError::Storage(format!("Failed to create upload directory {:?}: {}", root, e))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn object_name(digest: &str, extension: &str) -> String {
        format!("{}{}", digest, extension)
    }

    pub fn path_for(&self, digest: &str, extension: &str) -> PathBuf {
        self.root.join(Self::object_name(digest, extension))
    }

    /// Writes `data` under its content address. The bytes go to a temp file
    /// in the same directory first and are renamed into place, so readers
    /// never observe a partial object.
    pub fn put(&self, data: &[u8], extension: &str) -> Result<StoredObject> {
        let digest = hash_bytes(data);
        let object_name = Self::object_name(&digest, extension);
        let path = self.root.join(&object_name);

        if path.is_file() {
            match hash_file(&path, DEFAULT_CHUNK_SIZE) {
                Ok(existing) if existing == digest => {
                    tracing::debug!("Reusing stored object {}", object_name);
                    return Ok(StoredObject { path, object_name, digest, created: false });
                }
                Ok(_) => tracing::warn!("Stored object {} is corrupt, rewriting", object_name),
                Err(e) => tracing::warn!("Failed to verify stored object {}: {}", object_name, e),
            }
        }

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)
            .map_err(|e| CoreError::Storage(format!("Failed to persist {}: {}", object_name, e.error)))?;

        tracing::info!("Stored {} ({} bytes)", object_name, data.len());
        Ok(StoredObject { path, object_name, digest, created: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("uploads");
        let store = UploadStore::open(&root).unwrap();
        assert!(store.root().is_dir());
    }

    #[test]
    fn objects_are_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path()).unwrap();

        let stored = store.put(b"hello world", ".txt").unwrap();
        assert!(stored.created);
        assert_eq!(stored.object_name, format!("{}.txt", hash_bytes(b"hello world")));
        assert_eq!(fs::read(&stored.path).unwrap(), b"hello world");
    }

    #[test]
    fn identical_content_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path()).unwrap();

        let first = store.put(b"same bytes", ".bin").unwrap();
        let second = store.put(b"same bytes", ".bin").unwrap();
        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.path, second.path);
    }

    #[test]
    fn different_content_never_collides() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path()).unwrap();

        let a = store.put(b"first upload", ".exe").unwrap();
        let b = store.put(b"second upload", ".exe").unwrap();
        assert_ne!(a.path, b.path);
        assert_eq!(fs::read(&a.path).unwrap(), b"first upload");
        assert_eq!(fs::read(&b.path).unwrap(), b"second upload");
    }

    #[test]
    fn corrupt_object_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path()).unwrap();

        let path = store.path_for(&hash_bytes(b"payload"), "");
        fs::write(&path, b"tampered").unwrap();

        let stored = store.put(b"payload", "").unwrap();
        assert!(stored.created);
        assert_eq!(fs::read(&path).unwrap(), b"payload");
    }

    #[test]
    fn no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path()).unwrap();
        store.put(b"one", ".txt").unwrap();
        store.put(b"two", ".txt").unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
