use crate::decoder::HeaderDecoder;
use crate::metadata::{CompressionLabel, ImageMetadata, Resolution};
use crate::reader::{ByteReader, Endian};
use pixmeta_common::{DecodeError, MediaFormat};

const MANUFACTURER: usize = 0;
const ZSOFT: u8 = 0x0A;
const BITS_PER_PLANE: usize = 3;
const X_MIN: usize = 4;
const Y_MIN: usize = 6;
const X_MAX: usize = 8;
const Y_MAX: usize = 10;
const H_DPI: usize = 12;
const V_DPI: usize = 14;
const PLANES: usize = 65;

/// Inclusive window extent; `None` for an inverted window
fn extent(min: u16, max: u16) -> Option<u32> {
    max.checked_sub(min).map(|span| u32::from(span) + 1)
}

/// ZSoft PCX header decoder.
///
/// Depth is reported as bits-per-plane × planes. For planar and
/// palette-indexed images that is not the displayed depth, so the record is
/// flagged approximate.
pub struct PcxDecoder;

impl HeaderDecoder for PcxDecoder {
    fn decode(&self, reader: ByteReader<'_>) -> Result<ImageMetadata, DecodeError> {
        if reader.read_u8(MANUFACTURER)? != ZSOFT {
            return Err(DecodeError::SignatureMismatch {
                offset: MANUFACTURER,
                expected: "ZSoft manufacturer byte 0x0A",
            });
        }

        let bits_per_plane = reader.read_u8(BITS_PER_PLANE)?;
        let x_min = reader.read_u16(X_MIN, Endian::Little)?;
        let y_min = reader.read_u16(Y_MIN, Endian::Little)?;
        let x_max = reader.read_u16(X_MAX, Endian::Little)?;
        let y_max = reader.read_u16(Y_MAX, Endian::Little)?;
        let h_dpi = reader.read_u16(H_DPI, Endian::Little)?;
        let v_dpi = reader.read_u16(V_DPI, Endian::Little)?;
        let planes = reader.read_u8(PLANES)?;

        let bpp = u32::from(bits_per_plane) * u32::from(planes);

        let metadata = match (extent(x_min, x_max), extent(y_min, y_max)) {
            (Some(width), Some(height)) => {
                ImageMetadata::new(MediaFormat::Pcx, width, height, bpp, CompressionLabel::Rle)
            }
            _ => ImageMetadata::without_dimensions(MediaFormat::Pcx, bpp, CompressionLabel::Rle),
        };

        let resolution = match (h_dpi, v_dpi) {
            (0, _) => None,
            (h, 0) => Some(Resolution::Uniform(u32::from(h))),
            (h, v) => Some(Resolution::per_axis(u32::from(h), u32::from(v))),
        };

        Ok(metadata.approximate_depth().with_resolution(resolution))
    }
}
