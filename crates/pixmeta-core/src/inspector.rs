use crate::source::{FileInput, FileKey};
use pixmeta_common::{DecodeError, MediaFormat, Result};
use pixmeta_formats::{DimensionProbe, ImageDecoder, ImageMetadata};
use pixmeta_metrics::{CompressionReport, MetricsCalculator};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Decoded header plus its compression figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inspection {
    pub metadata: ImageMetadata,
    pub report: CompressionReport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeStatus {
    Inspected(Inspection),
    /// Unsupported or malformed file; the batch carries on
    Failed(DecodeError),
    /// Same name and size as a file already seen in this batch
    Duplicate,
}

/// Result for one file of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub key: FileKey,
    pub status: OutcomeStatus,
}

impl FileOutcome {
    pub fn duplicate(key: FileKey) -> Self {
        Self {
            key,
            status: OutcomeStatus::Duplicate,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Inspected(_))
    }

    pub fn inspection(&self) -> Option<&Inspection> {
        match &self.status {
            OutcomeStatus::Inspected(inspection) => Some(inspection),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DecodeError> {
        match &self.status {
            OutcomeStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Per-file inspection engine: format dispatch, header decode, metrics
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    decoder: ImageDecoder,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_probe(probe: Arc<dyn DimensionProbe>) -> Self {
        Self {
            decoder: ImageDecoder::new(probe),
        }
    }

    pub async fn inspect(&self, input: &FileInput) -> FileOutcome {
        let key = input.key();

        let status = match self.inspect_buffer(input, key.size).await {
            Ok(inspection) => {
                let meta = &inspection.metadata;
                tracing::debug!(
                    "Inspected {}: {}x{} {} @ {} bpp",
                    input.name,
                    meta.width,
                    meta.height,
                    meta.format,
                    meta.bits_per_pixel
                );
                OutcomeStatus::Inspected(inspection)
            }
            Err(e) => {
                tracing::debug!("Skipping {}: {}", input.name, e);
                OutcomeStatus::Failed(e)
            }
        };

        FileOutcome { key, status }
    }

    async fn inspect_buffer(
        &self,
        input: &FileInput,
        stored_size: u64,
    ) -> std::result::Result<Inspection, DecodeError> {
        let format = MediaFormat::resolve(&input.name, input.mime.as_deref())?;
        let metadata = self.decoder.decode(format, &input.buffer).await?;
        let report = MetricsCalculator::calculate(&metadata, stored_size);

        Ok(Inspection { metadata, report })
    }

    /// Load a file from disk and inspect it
    pub async fn inspect_path(&self, path: &Path) -> Result<FileOutcome> {
        let input = FileInput::from_path(path)?;
        Ok(self.inspect(&input).await)
    }
}
