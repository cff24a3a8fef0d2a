use crate::bmp::BmpDecoder;
use crate::buffer::SharedBuffer;
use crate::gif::GifDecoder;
use crate::jpeg::JpegDecoder;
use crate::metadata::ImageMetadata;
use crate::pcx::PcxDecoder;
use crate::png::PngDecoder;
use crate::probe::{DimensionProbe, ImageCrateProbe};
use crate::reader::ByteReader;
use crate::tiff::TiffDecoder;
use pixmeta_common::{DecodeError, MediaFormat};
use std::sync::Arc;

/// Header parser for one image format.
///
/// Implementations are pure functions of the buffer: the same bytes always
/// yield the same record or the same error.
pub trait HeaderDecoder: Send + Sync {
    fn decode(&self, reader: ByteReader<'_>) -> Result<ImageMetadata, DecodeError>;
}

/// Select the header parser for a format
pub fn header_decoder(format: MediaFormat) -> &'static dyn HeaderDecoder {
    match format {
        MediaFormat::Jpeg => &JpegDecoder,
        MediaFormat::Png => &PngDecoder,
        MediaFormat::Gif => &GifDecoder,
        MediaFormat::Bmp => &BmpDecoder,
        MediaFormat::Pcx => &PcxDecoder,
        MediaFormat::Tiff => &TiffDecoder,
    }
}

/// Parse only what the header itself encodes.
///
/// For formats that delegate dimension discovery the returned record is
/// marked `dimensions_unknown`; use [`ImageDecoder::decode`] to get a
/// complete one.
pub fn decode_header(format: MediaFormat, bytes: &[u8]) -> Result<ImageMetadata, DecodeError> {
    header_decoder(format).decode(ByteReader::new(bytes))
}

/// Header decoder with an external loader for delegated dimensions
#[derive(Clone)]
pub struct ImageDecoder {
    probe: Arc<dyn DimensionProbe>,
}

impl ImageDecoder {
    pub fn new(probe: Arc<dyn DimensionProbe>) -> Self {
        Self { probe }
    }

    /// Decode a full record.
    ///
    /// Delegated dimensions are awaited here, so the caller only ever sees a
    /// finished record. A loader failure is final for that file: the record
    /// keeps zero dimensions and its `dimensions_unknown` flag.
    pub async fn decode(
        &self,
        format: MediaFormat,
        buffer: &SharedBuffer,
    ) -> Result<ImageMetadata, DecodeError> {
        let mut metadata = decode_header(format, buffer.as_slice())?;

        if format.delegates_dimensions() {
            match self.probe.dimensions(format, buffer.clone()).await {
                Ok((width, height)) => metadata.resolve_dimensions(width, height),
                Err(e) => tracing::debug!("{format} dimension probe failed: {e}"),
            }
        }

        Ok(metadata)
    }
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self::new(Arc::new(ImageCrateProbe))
    }
}

impl std::fmt::Debug for ImageDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageDecoder").finish_non_exhaustive()
    }
}
