//! Content-addressed blob storage.
//!
//! Each blob is the full content of one file at one point in time, stored
//! under its SHA-256 digest and the digest of the file name it was recorded
//! for, so object paths have a fixed length however deep the file is. Blobs are
//! write-once: storing the same `(name, digest)` pair again is a no-op and
//! there is no update or delete. The store knows nothing about commits.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::layout::write_atomic;
use crate::storage::types::{BlobRef, ContentHash, FileName};

/// The object store rooted at `.gitlet/objects`.
pub struct ObjectStore {
    root: PathBuf,
    /// blobs known to be on disk, so repeated puts skip the filesystem check
    known: RwLock<HashSet<BlobRef>>,
}

impl ObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            known: RwLock::new(HashSet::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, blob: &BlobRef) -> PathBuf {
        self.root
            .join(blob.content_hash.to_hex())
            .join(blob.file_name.encoded())
    }

    /// store `bytes` as the content of `file_name`
    ///
    /// returns a reference usable as a tracked-set value
    pub fn put(&self, file_name: &FileName, bytes: &[u8]) -> StorageResult<BlobRef> {
        let blob = BlobRef::new(file_name.clone(), ContentHash::compute(bytes));

        if self.known.read().contains(&blob) {
            return Ok(blob);
        }

        let path = self.path_of(&blob);
        if !path.is_file() {
            write_atomic(&path, bytes)?;
            debug!(blob = %blob, size = bytes.len(), "wrote blob");
        }

        self.known.write().insert(blob.clone());
        Ok(blob)
    }

    /// read a blob's content
    ///
    /// the digest is checked on read, so a damaged object surfaces as
    /// `CorruptedData` instead of silently restoring the wrong bytes
    pub fn get(&self, blob: &BlobRef) -> StorageResult<Vec<u8>> {
        let path = self.path_of(blob);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::BlobNotFound(blob.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let actual = ContentHash::compute(&bytes);
        if actual != blob.content_hash {
            return Err(StorageError::CorruptedData {
                path,
                reason: format!("expected digest {}, found {}", blob.content_hash, actual),
            });
        }

        debug!(blob = %blob, size = bytes.len(), "read blob");
        Ok(bytes)
    }

    /// check whether a blob has been written
    pub fn contains(&self, blob: &BlobRef) -> bool {
        self.known.read().contains(blob) || self.path_of(blob).is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ObjectStore) {
        let dir = TempDir::new().unwrap();
        let store = ObjectStore::new(dir.path().join("objects"));
        (dir, store)
    }

    fn name(s: &str) -> FileName {
        FileName::new(s).unwrap()
    }

    #[test]
    fn test_put_get_roundtrip() {
        let (_dir, store) = setup();
        let contents: [&[u8]; 4] = [b"", b"hello", b"\x00\xff\x10binary", &[7u8; 10_000]];

        for bytes in contents {
            let blob = store.put(&name("f.bin"), bytes).unwrap();
            assert_eq!(store.get(&blob).unwrap(), bytes);
        }
    }

    #[test]
    fn test_put_is_idempotent() {
        let (_dir, store) = setup();
        let first = store.put(&name("a.txt"), b"same").unwrap();
        let second = store.put(&name("a.txt"), b"same").unwrap();
        assert_eq!(first, second);

        // a fresh handle has an empty cache and must find the file on disk
        let reopened = ObjectStore::new(store.root());
        assert!(reopened.contains(&first));
        assert_eq!(reopened.put(&name("a.txt"), b"same").unwrap(), first);
    }

    #[test]
    fn test_same_content_different_names_are_distinct() {
        let (_dir, store) = setup();
        let a = store.put(&name("a.txt"), b"shared").unwrap();
        let b = store.put(&name("b.txt"), b"shared").unwrap();

        assert_eq!(a.content_hash, b.content_hash);
        assert_ne!(a, b);
        assert_eq!(store.get(&b).unwrap(), b"shared");
    }

    #[test]
    fn test_long_names_roundtrip() {
        let (_dir, store) = setup();
        let flat = name(&"x".repeat(200));
        let nested = name(&format!("{}/{}/{}.rs", "a".repeat(60), "b".repeat(60), "c".repeat(40)));

        for file in [&flat, &nested] {
            let blob = store.put(file, b"deep content").unwrap();
            assert_eq!(&blob.file_name, file);
            assert_eq!(store.get(&blob).unwrap(), b"deep content");
        }
    }

    #[test]
    fn test_missing_blob() {
        let (_dir, store) = setup();
        let blob = BlobRef::new(name("ghost.txt"), ContentHash::compute(b"never written"));

        assert!(!store.contains(&blob));
        assert!(matches!(store.get(&blob), Err(StorageError::BlobNotFound(_))));
    }

    #[test]
    fn test_tampered_blob_is_detected() {
        let (_dir, store) = setup();
        let blob = store.put(&name("a.txt"), b"original").unwrap();
        fs::write(store.path_of(&blob), b"tampered").unwrap();

        assert!(matches!(store.get(&blob), Err(StorageError::CorruptedData { .. })));
    }
}
