use memmap2::Mmap;
use pixmeta_common::{Error, Result};
use pixmeta_formats::SharedBuffer;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

const TEN_MB_IN_BYTES: u64 = 10 * 1024 * 1024;

/// Identity of a file within one batch: name plus size in bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileKey {
    pub name: String,
    pub size: u64,
}

/// One selected file: name, optional MIME hint and its bytes
#[derive(Debug, Clone)]
pub struct FileInput {
    pub name: String,
    pub mime: Option<String>,
    pub buffer: SharedBuffer,
}

impl FileInput {
    pub fn new(name: impl Into<String>, buffer: impl Into<SharedBuffer>) -> Self {
        Self {
            name: name.into(),
            mime: None,
            buffer: buffer.into(),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Load a file from disk.
    ///
    /// Files over 10 MiB are memory-mapped; only the pages a header decoder
    /// touches are ever read.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(Error::InvalidPath(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidPath(PathBuf::from(path)))?;

        let file = File::open(path)?;
        let len = file.metadata()?.len();

        let buffer = if len > TEN_MB_IN_BYTES {
            tracing::debug!("Memory-mapping {} ({} bytes)", path.display(), len);
            // SAFETY: the map is read-only and the file is not modified while a
            // batch holds it.
            let mmap = unsafe { Mmap::map(&file)? };
            SharedBuffer::new(mmap)
        } else {
            SharedBuffer::from(std::fs::read(path)?)
        };

        Ok(Self::new(name, buffer))
    }

    pub fn size(&self) -> u64 {
        self.buffer.len() as u64
    }

    pub fn key(&self) -> FileKey {
        FileKey {
            name: self.name.clone(),
            size: self.size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_path_reads_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tiny.gif");
        std::fs::write(&path, b"GIF89a\x01\x00\x01\x00\x00\x00\x00").unwrap();

        let input = FileInput::from_path(&path).unwrap();

        assert_eq!(input.name, "tiny.gif");
        assert_eq!(input.mime, None);
        assert_eq!(
            input.key(),
            FileKey {
                name: "tiny.gif".to_string(),
                size: 13
            }
        );
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = FileInput::from_path(&temp_dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_directory_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let err = FileInput::from_path(temp_dir.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }

    #[test]
    fn test_same_name_different_size_are_distinct() {
        let a = FileInput::new("a.png", vec![0u8; 10]);
        let b = FileInput::new("a.png", vec![0u8; 11]);
        assert_ne!(a.key(), b.key());
    }
}
