use crate::error::ClassifyError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Largest upload the client will accept: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Where the bytes of a candidate file live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// A file handed over by the picker or a drop, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    /// Declared MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    pub source: FileSource,
}

impl FileCandidate {
    /// Describe a file on disk. Only metadata is read here.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = fs::metadata(path)
            .with_context(|| format!("cannot read file metadata: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            mime_type: guess_mime(&name),
            name,
            size: meta.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Describe an in-memory file. An empty `mime_type` is guessed from `name`.
    pub fn from_bytes(name: impl Into<String>, mime_type: &str, bytes: Arc<[u8]>) -> Self {
        let name = name.into();
        let mime_type = if mime_type.is_empty() {
            guess_mime(&name)
        } else {
            mime_type.to_string()
        };
        Self {
            name,
            mime_type,
            size: bytes.len() as u64,
            source: FileSource::Bytes(bytes),
        }
    }
}

fn guess_mime(name: &str) -> String {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}

/// An image that passed validation and is ready to preview and submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    inner: FileCandidate,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn mime_type(&self) -> &str {
        &self.inner.mime_type
    }

    pub fn size(&self) -> u64 {
        self.inner.size
    }

    /// Load the payload, from memory or from disk.
    pub fn read_bytes(&self) -> Result<Arc<[u8]>> {
        match &self.inner.source {
            FileSource::Bytes(bytes) => Ok(Arc::clone(bytes)),
            FileSource::Path(path) => {
                let bytes = fs::read(path)
                    .with_context(|| format!("cannot read image: {}", path.display()))?;
                Ok(bytes.into())
            }
        }
    }
}

/// Check a candidate in order (type, then size) and stop at the first failure.
pub fn validate(candidate: FileCandidate) -> Result<SelectedFile, ClassifyError> {
    if !candidate.mime_type.starts_with("image/") {
        return Err(ClassifyError::InvalidType);
    }
    if candidate.size > MAX_UPLOAD_BYTES {
        return Err(ClassifyError::TooLarge);
    }
    Ok(SelectedFile { inner: candidate })
}
