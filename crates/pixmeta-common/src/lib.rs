pub mod error;
pub mod format;

pub use error::{DecodeError, DecodeErrorKind, Error, Result};
pub use format::MediaFormat;
