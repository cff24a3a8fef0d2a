use crate::DecodeError;
use serde::Serialize;
use std::path::Path;

/// Image formats whose headers pixmeta understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Pcx,
    Tiff,
}

impl MediaFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse from extension string
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "pcx" => Some(Self::Pcx),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Parse from a MIME type, ignoring any parameters after `;`
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/bmp" | "image/x-bmp" | "image/x-ms-bmp" => Some(Self::Bmp),
            "image/pcx" | "image/x-pcx" | "image/vnd.zbrush.pcx" => Some(Self::Pcx),
            "image/tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Pick the format for a file from its name, falling back to its MIME type.
    ///
    /// Anything outside the six supported formats is rejected here, before a
    /// decoder ever sees the bytes.
    pub fn resolve(file_name: &str, mime: Option<&str>) -> Result<Self, DecodeError> {
        let ext = Path::new(file_name).extension().and_then(|e| e.to_str());

        if let Some(format) = ext.and_then(Self::from_extension) {
            return Ok(format);
        }
        if let Some(format) = mime.and_then(Self::from_mime) {
            return Ok(format);
        }

        let described = match (ext, mime) {
            (Some(ext), Some(mime)) => format!(".{ext} ({mime})"),
            (Some(ext), None) => format!(".{ext}"),
            (None, Some(mime)) => mime.to_string(),
            (None, None) => format!("{file_name} (no extension or MIME type)"),
        };
        Err(DecodeError::UnsupportedVariant(described))
    }

    /// Get primary file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Pcx => "pcx",
            Self::Tiff => "tiff",
        }
    }

    /// Get canonical MIME type
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Pcx => "image/x-pcx",
            Self::Tiff => "image/tiff",
        }
    }

    /// Convert to image crate's ImageFormat
    pub fn to_image_format(&self) -> Option<image::ImageFormat> {
        match self {
            Self::Jpeg => Some(image::ImageFormat::Jpeg),
            Self::Png => Some(image::ImageFormat::Png),
            Self::Gif => Some(image::ImageFormat::Gif),
            Self::Bmp => Some(image::ImageFormat::Bmp),
            Self::Tiff => Some(image::ImageFormat::Tiff),
            Self::Pcx => None,
        }
    }

    /// Whether pixel dimensions come from the external image loader
    /// instead of the header parser
    pub fn delegates_dimensions(&self) -> bool {
        matches!(self, Self::Tiff)
    }
}

impl std::fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecodeErrorKind;

    #[test]
    fn test_format_detection() {
        assert_eq!(MediaFormat::from_extension("png"), Some(MediaFormat::Png));
        assert_eq!(MediaFormat::from_extension("JPG"), Some(MediaFormat::Jpeg));
        assert_eq!(MediaFormat::from_extension("Tif"), Some(MediaFormat::Tiff));
        assert_eq!(MediaFormat::from_extension("webp"), None);
    }

    #[test]
    fn test_mime_fallback() {
        assert_eq!(
            MediaFormat::resolve("scan", Some("image/x-pcx")),
            Ok(MediaFormat::Pcx)
        );
        assert_eq!(
            MediaFormat::resolve("photo.jfif", Some("image/jpeg; q=0.9")),
            Ok(MediaFormat::Jpeg)
        );
        // extension wins over a contradicting MIME type
        assert_eq!(
            MediaFormat::resolve("logo.PNG", Some("image/gif")),
            Ok(MediaFormat::Png)
        );
    }

    #[test]
    fn test_unsupported_rejected() {
        let err = MediaFormat::resolve("picture.webp", Some("image/webp")).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::UnsupportedVariant);
        assert!(err.to_string().contains("webp"));

        let err = MediaFormat::resolve("README", None).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::UnsupportedVariant);
    }
}
