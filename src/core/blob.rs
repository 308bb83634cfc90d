//! Blob store - opaque attachment bytes, keyed by content hash
//!
//! The request store only ever holds references; the bytes live here.
//! References are the hex SHA-256 of the content, so re-uploading the
//! same file is a no-op and refs are safe to embed in any table.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

/// File extensions accepted at intake
pub const ALLOWED_EXTENSIONS: [&str; 9] = [
    "pdf", "png", "jpg", "jpeg", "doc", "docx", "xlsx", "xls", "zip",
];

/// Check a filename against the intake allow-list
pub fn allowed_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Blob not found: {blob_ref}")]
    NotFound { blob_ref: String },

    #[error("File type not allowed: {filename}")]
    DisallowedType { filename: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Storage for opaque attachment bytes
pub trait BlobStore {
    /// Store bytes, returning their reference
    fn put(&self, bytes: &[u8]) -> Result<String, BlobError>;

    /// Fetch the bytes for a reference
    fn get(&self, blob_ref: &str) -> Result<Vec<u8>, BlobError>;
}

/// Content-addressed blob store on the local filesystem
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Store a file from disk after checking its extension
    pub fn put_file(&self, path: &Path) -> Result<String, BlobError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if !allowed_file(&filename) {
            return Err(BlobError::DisallowedType { filename });
        }
        let bytes = fs::read(path)?;
        self.put(&bytes)
    }

    fn blob_path(&self, blob_ref: &str) -> PathBuf {
        self.root.join(blob_ref)
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, bytes: &[u8]) -> Result<String, BlobError> {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let blob_ref = format!("{:x}", hasher.finalize());

        let path = self.blob_path(&blob_ref);
        if !path.exists() {
            fs::create_dir_all(&self.root)?;
            fs::write(&path, bytes)?;
        }
        Ok(blob_ref)
    }

    fn get(&self, blob_ref: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.blob_path(blob_ref);
        if !path.exists() {
            return Err(BlobError::NotFound {
                blob_ref: blob_ref.to_string(),
            });
        }
        Ok(fs::read(path)?)
    }
}
