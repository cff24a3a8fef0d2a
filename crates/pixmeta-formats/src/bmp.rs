use crate::decoder::HeaderDecoder;
use crate::metadata::{CompressionLabel, ImageMetadata, Resolution};
use crate::reader::{ByteReader, Endian};
use pixmeta_common::{DecodeError, MediaFormat};

const INFO_HEADER_SIZE: usize = 14;
const WIDTH: usize = 18;
const HEIGHT: usize = 22;
const BITS_PER_PIXEL: usize = 28;
const COMPRESSION: usize = 30;
const X_PELS_PER_METRE: usize = 38;
const Y_PELS_PER_METRE: usize = 42;

/// OS/2 1.x BITMAPCOREHEADER: 16-bit dimensions, no compression or density
const CORE_HEADER_SIZE: u32 = 12;
const CORE_WIDTH: usize = 18;
const CORE_HEIGHT: usize = 20;
const CORE_BITS_PER_PIXEL: usize = 24;

/// BMP (DIB) header decoder
pub struct BmpDecoder;

impl BmpDecoder {
    fn decode_core(reader: ByteReader<'_>) -> Result<ImageMetadata, DecodeError> {
        let width = reader.read_u16(CORE_WIDTH, Endian::Little)?;
        let height = reader.read_u16(CORE_HEIGHT, Endian::Little)?;
        let bpp = reader.read_u16(CORE_BITS_PER_PIXEL, Endian::Little)?;

        Ok(ImageMetadata::new(
            MediaFormat::Bmp,
            u32::from(width),
            u32::from(height),
            u32::from(bpp),
            CompressionLabel::Uncompressed,
        ))
    }
}

impl HeaderDecoder for BmpDecoder {
    fn decode(&self, reader: ByteReader<'_>) -> Result<ImageMetadata, DecodeError> {
        reader.expect_signature(0, b"BM", "BM")?;

        if reader.read_u32(INFO_HEADER_SIZE, Endian::Little)? == CORE_HEADER_SIZE {
            return Self::decode_core(reader);
        }

        // negative height marks a top-down bitmap; only the magnitude matters here
        let width = reader.read_i32(WIDTH, Endian::Little)?.unsigned_abs();
        let height = reader.read_i32(HEIGHT, Endian::Little)?.unsigned_abs();
        let bpp = reader.read_u16(BITS_PER_PIXEL, Endian::Little)?;

        let compression = match reader.read_u32(COMPRESSION, Endian::Little)? {
            0 => CompressionLabel::Uncompressed,
            _ => CompressionLabel::RleOrBitfields,
        };

        let x_ppm = reader.read_i32(X_PELS_PER_METRE, Endian::Little)?;
        let y_ppm = reader.read_i32(Y_PELS_PER_METRE, Endian::Little)?;
        let resolution = (x_ppm > 0 && y_ppm > 0).then(|| {
            Resolution::per_axis(
                Resolution::dpi_from_per_metre(x_ppm.unsigned_abs()),
                Resolution::dpi_from_per_metre(y_ppm.unsigned_abs()),
            )
        });

        Ok(ImageMetadata::new(
            MediaFormat::Bmp,
            width,
            height,
            u32::from(bpp),
            compression,
        )
        .with_resolution(resolution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmeta_common::DecodeErrorKind;

    fn info_header(width: i32, height: i32, bpp: u16, compression: u32, ppm: (i32, i32)) -> Vec<u8> {
        let mut out = vec![0u8; 54];
        out[0..2].copy_from_slice(b"BM");
        out[14..18].copy_from_slice(&40u32.to_le_bytes());
        out[18..22].copy_from_slice(&width.to_le_bytes());
        out[22..26].copy_from_slice(&height.to_le_bytes());
        out[26..28].copy_from_slice(&1u16.to_le_bytes());
        out[28..30].copy_from_slice(&bpp.to_le_bytes());
        out[30..34].copy_from_slice(&compression.to_le_bytes());
        out[38..42].copy_from_slice(&ppm.0.to_le_bytes());
        out[42..46].copy_from_slice(&ppm.1.to_le_bytes());
        out
    }

    fn decode(bytes: &[u8]) -> Result<ImageMetadata, DecodeError> {
        BmpDecoder.decode(ByteReader::new(bytes))
    }

    #[test]
    fn test_top_down_height() {
        let meta = decode(&info_header(200, -100, 24, 0, (0, 0))).unwrap();

        assert_eq!((meta.width, meta.height), (200, 100));
        assert_eq!(meta.bits_per_pixel, 24);
        assert_eq!(meta.compression, CompressionLabel::Uncompressed);
        assert_eq!(meta.resolution, None);
    }

    #[test]
    fn test_negative_width_magnitude() {
        let meta = decode(&info_header(-50, 20, 8, 1, (2835, 2835))).unwrap();

        assert_eq!(meta.width, 50);
        assert_eq!(meta.compression, CompressionLabel::RleOrBitfields);
        assert_eq!(meta.resolution, Some(Resolution::per_axis(72, 72)));
    }

    #[test]
    fn test_axes_converted_independently() {
        let meta = decode(&info_header(10, 10, 32, 3, (11811, 5906))).unwrap();
        assert_eq!(meta.resolution, Some(Resolution::per_axis(300, 150)));
    }

    #[test]
    fn test_one_bad_axis_defaults_both() {
        let meta = decode(&info_header(10, 10, 32, 0, (11811, -1))).unwrap();

        assert_eq!(meta.resolution, None);
        assert_eq!(meta.effective_resolution(), Resolution::default_dpi());
    }

    #[test]
    fn test_os2_core_header() {
        let mut bytes = vec![0u8; 26];
        bytes[0..2].copy_from_slice(b"BM");
        bytes[14..18].copy_from_slice(&12u32.to_le_bytes());
        bytes[18..20].copy_from_slice(&640u16.to_le_bytes());
        bytes[20..22].copy_from_slice(&480u16.to_le_bytes());
        bytes[22..24].copy_from_slice(&1u16.to_le_bytes());
        bytes[24..26].copy_from_slice(&8u16.to_le_bytes());

        let meta = decode(&bytes).unwrap();
        assert_eq!((meta.width, meta.height), (640, 480));
        assert_eq!(meta.bits_per_pixel, 8);
        assert_eq!(meta.compression, CompressionLabel::Uncompressed);
    }

    #[test]
    fn test_zero_height_is_unknown() {
        let meta = decode(&info_header(200, 0, 24, 0, (0, 0))).unwrap();

        assert!(meta.dimensions_unknown);
        assert_eq!((meta.width, meta.height), (0, 0));
    }

    #[test]
    fn test_os2_zero_width_is_unknown() {
        let mut bytes = vec![0u8; 26];
        bytes[0..2].copy_from_slice(b"BM");
        bytes[14..18].copy_from_slice(&12u32.to_le_bytes());
        bytes[20..22].copy_from_slice(&480u16.to_le_bytes());
        bytes[24..26].copy_from_slice(&8u16.to_le_bytes());

        let meta = decode(&bytes).unwrap();
        assert!(meta.dimensions_unknown);
        assert_eq!(meta.bits_per_pixel, 8);
    }

    #[test]
    fn test_not_a_bitmap() {
        let mut bytes = info_header(1, 1, 24, 0, (0, 0));
        bytes[0..2].copy_from_slice(b"MZ");

        let err = decode(&bytes).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::SignatureMismatch);
        assert_eq!(err.offset(), Some(0));
    }

    #[test]
    fn test_truncated_density() {
        let bytes = info_header(1, 1, 24, 0, (0, 0));
        let err = decode(&bytes[..40]).unwrap_err();

        assert_eq!(err.kind(), DecodeErrorKind::TruncatedBuffer);
        assert_eq!(err.offset(), Some(38));
    }
}
