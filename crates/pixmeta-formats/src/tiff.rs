use crate::decoder::HeaderDecoder;
use crate::metadata::{CompressionLabel, ImageMetadata};
use crate::reader::ByteReader;
use pixmeta_common::{DecodeError, MediaFormat};

const LITTLE_ENDIAN_HEADER: &[u8; 4] = b"II*\0";
const BIG_ENDIAN_HEADER: &[u8; 4] = b"MM\0*";

/// Reported for every TIFF; the IFD is not walked
const DEFAULT_BITS_PER_PIXEL: u32 = 24;

/// TIFF header decoder.
///
/// Only the byte-order header is checked. Dimensions are left for the
/// external loader (see [`crate::ImageDecoder::decode`]); depth and
/// resolution are fixed defaults.
pub struct TiffDecoder;

impl HeaderDecoder for TiffDecoder {
    fn decode(&self, reader: ByteReader<'_>) -> Result<ImageMetadata, DecodeError> {
        let header = reader.slice(0, 4)?;
        if header != LITTLE_ENDIAN_HEADER && header != BIG_ENDIAN_HEADER {
            return Err(DecodeError::SignatureMismatch {
                offset: 0,
                expected: "II*\\0 or MM\\0*",
            });
        }

        Ok(ImageMetadata::without_dimensions(
            MediaFormat::Tiff,
            DEFAULT_BITS_PER_PIXEL,
            CompressionLabel::ContainerDelegated,
        )
        .approximate_depth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Resolution;
    use pixmeta_common::DecodeErrorKind;

    #[test]
    fn test_both_byte_orders() {
        for header in [b"II*\0\x08\0\0\0", b"MM\0*\0\0\0\x08"] {
            let meta = TiffDecoder.decode(ByteReader::new(header)).unwrap();

            assert!(meta.dimensions_unknown);
            assert_eq!(meta.bits_per_pixel, 24);
            assert_eq!(meta.compression, CompressionLabel::ContainerDelegated);
            assert_eq!(meta.effective_resolution(), Resolution::default_dpi());
        }
    }

    #[test]
    fn test_bad_byte_order() {
        let err = TiffDecoder.decode(ByteReader::new(b"IM*\0")).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::SignatureMismatch);

        let err = TiffDecoder.decode(ByteReader::new(b"II")).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::TruncatedBuffer);
    }
}
