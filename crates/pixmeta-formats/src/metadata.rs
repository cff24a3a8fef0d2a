use pixmeta_common::MediaFormat;
use serde::Serialize;
use std::fmt;

/// Resolution substituted when a header carries none
pub const DEFAULT_DPI: u32 = 72;

/// Print resolution as stored in a header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// One value for both axes
    Uniform(u32),
    PerAxis { horizontal: u32, vertical: u32 },
}

impl Resolution {
    pub fn default_dpi() -> Self {
        Self::PerAxis {
            horizontal: DEFAULT_DPI,
            vertical: DEFAULT_DPI,
        }
    }

    pub fn per_axis(horizontal: u32, vertical: u32) -> Self {
        Self::PerAxis {
            horizontal,
            vertical,
        }
    }

    /// Dots per inch from a pixels-per-metre density
    pub fn dpi_from_per_metre(value: u32) -> u32 {
        (f64::from(value) * 0.0254).round() as u32
    }

    /// Dots per inch from a pixels-per-centimetre density
    pub fn dpi_from_per_cm(value: u32) -> u32 {
        (f64::from(value) * 2.54).round() as u32
    }

    pub fn horizontal(&self) -> u32 {
        match *self {
            Self::Uniform(dpi) => dpi,
            Self::PerAxis { horizontal, .. } => horizontal,
        }
    }

    pub fn vertical(&self) -> u32 {
        match *self {
            Self::Uniform(dpi) => dpi,
            Self::PerAxis { vertical, .. } => vertical,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform(dpi) => write!(f, "{dpi} dpi"),
            Self::PerAxis {
                horizontal,
                vertical,
            } => write!(f, "{horizontal} × {vertical} dpi"),
        }
    }
}

/// Compression scheme detected in a header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionLabel {
    BaselineDct,
    ProgressiveDct,
    /// Any other DCT frame type (extended sequential, lossless)
    Dct,
    Deflate,
    Lzw,
    Rle,
    Uncompressed,
    /// BMP compression codes other than 0; RLE and bitfields are not told apart
    RleOrBitfields,
    ContainerDelegated,
    Unknown,
}

impl fmt::Display for CompressionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BaselineDct => "Baseline DCT",
            Self::ProgressiveDct => "Progressive DCT",
            Self::Dct => "JPEG/DCT",
            Self::Deflate => "Deflate",
            Self::Lzw => "LZW",
            Self::Rle => "RLE",
            Self::Uncompressed => "Uncompressed",
            Self::RleOrBitfields => "RLE/Bitfields",
            Self::ContainerDelegated => "Container-Delegated",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// Structural metadata extracted from one file's header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMetadata {
    pub format: MediaFormat,
    pub width: u32,
    pub height: u32,
    /// Set when the decoder could not determine width and height;
    /// both are 0 in that case.
    pub dimensions_unknown: bool,
    pub bits_per_pixel: u32,
    /// `bits_per_pixel` is an estimate rather than the stored pixel depth
    pub depth_is_approximate: bool,
    /// Global color table size, for palette formats that declare one
    pub palette_colors: Option<u32>,
    /// `None` when the header does not encode a resolution
    pub resolution: Option<Resolution>,
    pub compression: CompressionLabel,
}

impl ImageMetadata {
    /// Record for a header with dimensions.
    ///
    /// A `0` on either axis is not a size: the record comes back with both
    /// axes zeroed and `dimensions_unknown` set.
    pub fn new(
        format: MediaFormat,
        width: u32,
        height: u32,
        bits_per_pixel: u32,
        compression: CompressionLabel,
    ) -> Self {
        let mut metadata = Self {
            format,
            width: 0,
            height: 0,
            dimensions_unknown: true,
            bits_per_pixel,
            depth_is_approximate: false,
            palette_colors: None,
            resolution: None,
            compression,
        };
        metadata.resolve_dimensions(width, height);
        metadata
    }

    /// Record for a file whose dimensions could not be read
    pub fn without_dimensions(
        format: MediaFormat,
        bits_per_pixel: u32,
        compression: CompressionLabel,
    ) -> Self {
        Self::new(format, 0, 0, bits_per_pixel, compression)
    }

    pub fn with_resolution(mut self, resolution: Option<Resolution>) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_palette_colors(mut self, colors: u32) -> Self {
        self.palette_colors = Some(colors);
        self
    }

    pub fn approximate_depth(mut self) -> Self {
        self.depth_is_approximate = true;
        self
    }

    /// Fill in dimensions reported by an external loader.
    ///
    /// A `0` on either axis keeps the record marked as unknown. Applying the
    /// same answer twice leaves the record unchanged.
    pub(crate) fn resolve_dimensions(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            self.width = 0;
            self.height = 0;
            self.dimensions_unknown = true;
        } else {
            self.width = width;
            self.height = height;
            self.dimensions_unknown = false;
        }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Header resolution, or 72 × 72 dpi when none was stored
    pub fn effective_resolution(&self) -> Resolution {
        self.resolution.unwrap_or_else(Resolution::default_dpi)
    }
}
