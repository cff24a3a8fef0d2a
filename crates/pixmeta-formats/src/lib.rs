pub mod bmp;
pub mod buffer;
pub mod decoder;
pub mod gif;
pub mod jpeg;
pub mod metadata;
pub mod pcx;
pub mod png;
pub mod probe;
pub mod reader;
pub mod tiff;

pub use buffer::SharedBuffer;
pub use decoder::{decode_header, header_decoder, HeaderDecoder, ImageDecoder};
pub use metadata::{CompressionLabel, ImageMetadata, Resolution, DEFAULT_DPI};
pub use probe::{DimensionProbe, ImageCrateProbe, ProbeError, ProbeFuture};
pub use reader::{ByteReader, Endian};
