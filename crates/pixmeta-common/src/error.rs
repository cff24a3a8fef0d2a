use std::path::PathBuf;

/// Per-file header decoding failure
///
/// Never fatal to a batch: the caller records it as that file's outcome and
/// moves on to the next file.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Truncated buffer: {needed} byte(s) at offset {offset} exceed buffer length {len}")]
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("Signature mismatch at offset {offset}: expected {expected}")]
    SignatureMismatch {
        offset: usize,
        expected: &'static str,
    },

    #[error("Unsupported variant: {0}")]
    UnsupportedVariant(String),
}

/// Discriminant of [`DecodeError`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeErrorKind {
    TruncatedBuffer,
    SignatureMismatch,
    UnsupportedVariant,
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            Self::TruncatedBuffer { .. } => DecodeErrorKind::TruncatedBuffer,
            Self::SignatureMismatch { .. } => DecodeErrorKind::SignatureMismatch,
            Self::UnsupportedVariant(_) => DecodeErrorKind::UnsupportedVariant,
        }
    }

    /// Byte offset at which the failure was detected, if it has one
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::TruncatedBuffer { offset, .. } | Self::SignatureMismatch { offset, .. } => {
                Some(*offset)
            }
            Self::UnsupportedVariant(_) => None,
        }
    }
}

/// Unified error type for all pixmeta operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid file path: {0}")]
    InvalidPath(PathBuf),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
