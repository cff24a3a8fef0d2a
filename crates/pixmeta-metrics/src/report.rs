use pixmeta_formats::ImageMetadata;
use serde::Serialize;
use std::cmp::Ordering;

/// How the stored file compares to its raw bitmap estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Stored file is smaller than the raw estimate
    Compressed,
    Unchanged,
    /// Stored file is larger than the raw estimate. Common for tiny or
    /// already heavily compressed files; an anomaly, not an error.
    Expanded,
}

/// Compression figures for one file
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompressionMetrics {
    /// Uncompressed bitmap estimate (bytes)
    pub raw_size_bytes: u64,

    /// File size on disk (bytes)
    pub stored_size_bytes: u64,

    /// Compression ratio (raw / stored)
    pub ratio: f64,

    pub classification: Classification,

    /// `(1 - stored / raw) * 100`; negative for expanded files
    pub savings_percent: f64,
}

/// Outcome of the metrics step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompressionReport {
    /// Dimensions, depth or stored size missing; nothing to compare
    NoData,
    Measured(CompressionMetrics),
}

impl CompressionReport {
    pub fn metrics(&self) -> Option<&CompressionMetrics> {
        match self {
            Self::Measured(metrics) => Some(metrics),
            Self::NoData => None,
        }
    }
}

/// Derives compression figures from header metadata and file size
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// `width * height * bpp / 8`, rounded down; `None` if any factor is 0
    pub fn raw_size_bytes(width: u32, height: u32, bits_per_pixel: u32) -> Option<u64> {
        if width == 0 || height == 0 || bits_per_pixel == 0 {
            return None;
        }
        let bits = u128::from(width) * u128::from(height) * u128::from(bits_per_pixel);
        u64::try_from(bits / 8).ok()
    }

    pub fn calculate(metadata: &ImageMetadata, stored_size_bytes: u64) -> CompressionReport {
        let raw = Self::raw_size_bytes(metadata.width, metadata.height, metadata.bits_per_pixel);

        match raw {
            Some(raw) if raw > 0 && stored_size_bytes > 0 => {
                CompressionReport::Measured(Self::measure(raw, stored_size_bytes))
            }
            _ => CompressionReport::NoData,
        }
    }

    fn measure(raw: u64, stored: u64) -> CompressionMetrics {
        // compare the integers so "exactly 1" never depends on float rounding
        let classification = match raw.cmp(&stored) {
            Ordering::Greater => Classification::Compressed,
            Ordering::Equal => Classification::Unchanged,
            Ordering::Less => Classification::Expanded,
        };

        let ratio = raw as f64 / stored as f64;
        let savings_percent = match classification {
            Classification::Unchanged => 0.0,
            _ => (1.0 - stored as f64 / raw as f64) * 100.0,
        };

        CompressionMetrics {
            raw_size_bytes: raw,
            stored_size_bytes: stored,
            ratio,
            classification,
            savings_percent,
        }
    }
}
