use crate::decoder::HeaderDecoder;
use crate::metadata::{CompressionLabel, ImageMetadata, Resolution};
use crate::reader::{ByteReader, Endian};
use pixmeta_common::{DecodeError, MediaFormat};

/// The 8-byte file signature is not re-checked; chunks start right after it
const FIRST_CHUNK: usize = 8;
const IHDR_TYPE: usize = 12;
const IHDR_WIDTH: usize = 16;
const IHDR_HEIGHT: usize = 20;
const IHDR_BIT_DEPTH: usize = 24;
const IHDR_COLOR_TYPE: usize = 25;

/// length(4) + type(4) + crc(4)
const CHUNK_OVERHEAD: usize = 12;

const PHYS_UNIT_METRE: u8 = 1;

fn channels(color_type: u8) -> u32 {
    match color_type {
        0 => 1, // grayscale
        2 => 3, // RGB
        3 => 1, // palette index
        4 => 2, // grayscale + alpha
        6 => 4, // RGBA
        _ => 3,
    }
}

/// Walk the chunk list for a `pHYs` density
fn find_physical_density(reader: ByteReader<'_>) -> Result<Option<Resolution>, DecodeError> {
    let mut at = FIRST_CHUNK;

    while reader.has(at, 8) {
        let length = reader.read_u32(at, Endian::Big)? as usize;
        let chunk_type = reader.slice(at + 4, 4)?;

        match chunk_type {
            b"pHYs" => {
                let x = reader.read_u32(at + 8, Endian::Big)?;
                let y = reader.read_u32(at + 12, Endian::Big)?;
                let unit = reader.read_u8(at + 16)?;

                if unit != PHYS_UNIT_METRE || x == 0 || y == 0 {
                    return Ok(None);
                }

                let resolution = if x == y {
                    Resolution::Uniform(Resolution::dpi_from_per_metre(x))
                } else {
                    Resolution::per_axis(
                        Resolution::dpi_from_per_metre(x),
                        Resolution::dpi_from_per_metre(y),
                    )
                };
                return Ok(Some(resolution));
            }
            b"IEND" => break,
            _ => {}
        }

        match at
            .checked_add(CHUNK_OVERHEAD)
            .and_then(|next| next.checked_add(length))
        {
            Some(next) => at = next,
            None => break,
        }
    }

    Ok(None)
}

/// PNG header decoder.
///
/// Reads IHDR at its fixed position after the signature, then scans the
/// chunk list for a `pHYs` density. Compression is always Deflate.
pub struct PngDecoder;

impl HeaderDecoder for PngDecoder {
    fn decode(&self, reader: ByteReader<'_>) -> Result<ImageMetadata, DecodeError> {
        reader.expect_signature(IHDR_TYPE, b"IHDR", "IHDR")?;

        let width = reader.read_u32(IHDR_WIDTH, Endian::Big)?;
        let height = reader.read_u32(IHDR_HEIGHT, Endian::Big)?;
        let bit_depth = reader.read_u8(IHDR_BIT_DEPTH)?;
        let color_type = reader.read_u8(IHDR_COLOR_TYPE)?;

        let resolution = find_physical_density(reader)?;

        Ok(ImageMetadata::new(
            MediaFormat::Png,
            width,
            height,
            u32::from(bit_depth) * channels(color_type),
            CompressionLabel::Deflate,
        )
        .with_resolution(resolution))
    }
}
