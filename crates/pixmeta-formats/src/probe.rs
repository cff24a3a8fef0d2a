use crate::buffer::SharedBuffer;
use futures::future::BoxFuture;
use futures::FutureExt;
use image::ImageReader;
use pixmeta_common::MediaFormat;
use std::io::Cursor;

/// Failure of the external image loader
#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    #[error("No image loader available for {0}")]
    Unsupported(MediaFormat),

    #[error("Image loader failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image loader task failed: {0}")]
    Task(String),
}

pub type ProbeFuture = BoxFuture<'static, Result<(u32, u32), ProbeError>>;

/// External facility that loads an image to learn its pixel dimensions.
///
/// Used for containers whose header layout is not parsed directly.
pub trait DimensionProbe: Send + Sync {
    fn dimensions(&self, format: MediaFormat, buffer: SharedBuffer) -> ProbeFuture;
}

/// Dimension probe backed by the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateProbe;

impl ImageCrateProbe {
    /// Synchronous probe, for callers already off the async runtime
    pub fn probe_blocking(format: MediaFormat, bytes: &[u8]) -> Result<(u32, u32), ProbeError> {
        let image_format = format
            .to_image_format()
            .ok_or(ProbeError::Unsupported(format))?;

        let reader = ImageReader::with_format(Cursor::new(bytes), image_format);
        Ok(reader.into_dimensions()?)
    }
}

impl DimensionProbe for ImageCrateProbe {
    fn dimensions(&self, format: MediaFormat, buffer: SharedBuffer) -> ProbeFuture {
        async move {
            // Decoding container structure is CPU work; keep it off the async workers
            tokio::task::spawn_blocking(move || Self::probe_blocking(format, buffer.as_slice()))
                .await
                .map_err(|e| ProbeError::Task(e.to_string()))?
        }
        .boxed()
    }
}
