use crate::decoder::HeaderDecoder;
use crate::metadata::{CompressionLabel, ImageMetadata};
use crate::reader::{ByteReader, Endian};
use pixmeta_common::{DecodeError, MediaFormat};

const LOGICAL_WIDTH: usize = 6;
const LOGICAL_HEIGHT: usize = 8;
const PACKED_FIELDS: usize = 10;

/// Palette indices are reported as 8 bits regardless of table size
const BITS_PER_PIXEL: u32 = 8;

/// GIF logical screen descriptor decoder
pub struct GifDecoder;

impl HeaderDecoder for GifDecoder {
    fn decode(&self, reader: ByteReader<'_>) -> Result<ImageMetadata, DecodeError> {
        let version = reader.slice(0, 6)?;
        if version != b"GIF87a" && version != b"GIF89a" {
            return Err(DecodeError::SignatureMismatch {
                offset: 0,
                expected: "GIF87a or GIF89a",
            });
        }

        let width = reader.read_u16(LOGICAL_WIDTH, Endian::Little)?;
        let height = reader.read_u16(LOGICAL_HEIGHT, Endian::Little)?;
        let packed = reader.read_u8(PACKED_FIELDS)?;

        // low three bits: global color table holds 2^(n + 1) entries
        let colors = 1u32 << ((packed & 0b111) + 1);

        Ok(ImageMetadata::new(
            MediaFormat::Gif,
            u32::from(width),
            u32::from(height),
            BITS_PER_PIXEL,
            CompressionLabel::Lzw,
        )
        .with_palette_colors(colors))
    }
}
