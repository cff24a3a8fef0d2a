use crate::decoder::HeaderDecoder;
use crate::metadata::{CompressionLabel, ImageMetadata, Resolution};
use crate::reader::{ByteReader, Endian};
use pixmeta_common::{DecodeError, MediaFormat};

const SOF_BASELINE: u16 = 0xFFC0;
const SOF_PROGRESSIVE: u16 = 0xFFC2;
const SOF_LAST: u16 = 0xFFC3;

/// "JFIF" read as a big-endian u32
const JFIF_IDENTIFIER: u32 = 0x4A46_4946;

/// Assumed when no frame header is present
const DEFAULT_BITS_PER_PIXEL: u32 = 24;

const DENSITY_DOTS_PER_INCH: u8 = 1;
const DENSITY_DOTS_PER_CM: u8 = 2;

/// Start-of-frame fields, offsets relative to the marker
struct Frame {
    marker: u16,
    precision: u8,
    height: u16,
    width: u16,
    components: u8,
}

impl Frame {
    fn read(reader: ByteReader<'_>, at: usize, marker: u16) -> Result<Self, DecodeError> {
        // marker(2) length(2) precision(1) height(2) width(2) components(1)
        Ok(Self {
            marker,
            precision: reader.read_u8(at + 4)?,
            height: reader.read_u16(at + 5, Endian::Big)?,
            width: reader.read_u16(at + 7, Endian::Big)?,
            components: reader.read_u8(at + 9)?,
        })
    }

    fn compression(&self) -> CompressionLabel {
        match self.marker {
            SOF_BASELINE => CompressionLabel::BaselineDct,
            SOF_PROGRESSIVE => CompressionLabel::ProgressiveDct,
            _ => CompressionLabel::Dct,
        }
    }
}

/// Density fields of a JFIF APP0 segment, offsets relative to "JFIF"
fn read_density(reader: ByteReader<'_>, at: usize) -> Result<Option<Resolution>, DecodeError> {
    // "JFIF\0"(5) version(2) units(1) x density(2) y density(2)
    let units = reader.read_u8(at + 7)?;
    let x = u32::from(reader.read_u16(at + 8, Endian::Big)?);
    let y = u32::from(reader.read_u16(at + 10, Endian::Big)?);

    if x == 0 || y == 0 {
        return Ok(None);
    }

    Ok(match units {
        DENSITY_DOTS_PER_INCH => Some(Resolution::per_axis(x, y)),
        DENSITY_DOTS_PER_CM => Some(Resolution::per_axis(
            Resolution::dpi_from_per_cm(x),
            Resolution::dpi_from_per_cm(y),
        )),
        // 0 is a pixel aspect ratio, not a density
        _ => None,
    })
}

/// JPEG header decoder.
///
/// One linear pass looks for the first start-of-frame marker
/// (`FFC0`..=`FFC3`) and the first JFIF identifier. Either may be missing:
/// no frame means unknown dimensions with an assumed 24-bit depth, no JFIF
/// density means the default resolution.
pub struct JpegDecoder;

impl HeaderDecoder for JpegDecoder {
    fn decode(&self, reader: ByteReader<'_>) -> Result<ImageMetadata, DecodeError> {
        let mut frame: Option<Frame> = None;
        let mut jfif_seen = false;
        let mut resolution = None;

        let mut at = 0;
        while reader.has(at, 2) && (frame.is_none() || !jfif_seen) {
            if frame.is_none() {
                let marker = reader.read_u16(at, Endian::Big)?;
                if (SOF_BASELINE..=SOF_LAST).contains(&marker) {
                    frame = Some(Frame::read(reader, at, marker)?);
                }
            }

            if !jfif_seen
                && reader.has(at, 4)
                && reader.read_u32(at, Endian::Big)? == JFIF_IDENTIFIER
            {
                jfif_seen = true;
                resolution = read_density(reader, at)?;
            }

            at += 1;
        }

        let metadata = match frame {
            Some(frame) if frame.width > 0 && frame.height > 0 => ImageMetadata::new(
                MediaFormat::Jpeg,
                u32::from(frame.width),
                u32::from(frame.height),
                u32::from(frame.precision) * u32::from(frame.components),
                frame.compression(),
            ),
            // height 0 is deferred to a DNL segment; not resolvable from the header
            Some(frame) => ImageMetadata::without_dimensions(
                MediaFormat::Jpeg,
                u32::from(frame.precision) * u32::from(frame.components),
                frame.compression(),
            ),
            None => ImageMetadata::without_dimensions(
                MediaFormat::Jpeg,
                DEFAULT_BITS_PER_PIXEL,
                CompressionLabel::Unknown,
            )
            .approximate_depth(),
        };

        Ok(metadata.with_resolution(resolution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixmeta_common::DecodeErrorKind;

    fn app0(units: u8, x: u16, y: u16) -> Vec<u8> {
        let mut seg = vec![0xFF, 0xE0, 0x00, 0x10];
        seg.extend_from_slice(b"JFIF\0");
        seg.extend_from_slice(&[1, 2, units]);
        seg.extend_from_slice(&x.to_be_bytes());
        seg.extend_from_slice(&y.to_be_bytes());
        seg.extend_from_slice(&[0, 0]);
        seg
    }

    fn sof(marker: u8, precision: u8, width: u16, height: u16, components: u8) -> Vec<u8> {
        let mut seg = vec![0xFF, marker, 0x00, 0x11, precision];
        seg.extend_from_slice(&height.to_be_bytes());
        seg.extend_from_slice(&width.to_be_bytes());
        seg.push(components);
        for id in 1..=components {
            seg.extend_from_slice(&[id, 0x11, 0]);
        }
        seg
    }

    fn jpeg(segments: &[Vec<u8>]) -> Vec<u8> {
        let mut out = vec![0xFF, 0xD8];
        for seg in segments {
            out.extend_from_slice(seg);
        }
        out.extend_from_slice(&[0xFF, 0xD9]);
        out
    }

    fn decode(bytes: &[u8]) -> Result<ImageMetadata, DecodeError> {
        JpegDecoder.decode(ByteReader::new(bytes))
    }

    #[test]
    fn test_baseline_with_dpi() {
        let bytes = jpeg(&[app0(1, 300, 300), sof(0xC0, 8, 640, 480, 3)]);
        let meta = decode(&bytes).unwrap();

        assert_eq!((meta.width, meta.height), (640, 480));
        assert_eq!(meta.bits_per_pixel, 24);
        assert_eq!(meta.compression, CompressionLabel::BaselineDct);
        assert_eq!(meta.resolution, Some(Resolution::per_axis(300, 300)));
        assert!(!meta.depth_is_approximate);
    }

    #[test]
    fn test_progressive_grayscale_per_cm() {
        let bytes = jpeg(&[app0(2, 118, 59), sof(0xC2, 8, 16, 8, 1)]);
        let meta = decode(&bytes).unwrap();

        assert_eq!(meta.bits_per_pixel, 8);
        assert_eq!(meta.compression, CompressionLabel::ProgressiveDct);
        assert_eq!(meta.resolution, Some(Resolution::per_axis(300, 150)));
    }

    #[test]
    fn test_aspect_ratio_units_ignored() {
        let bytes = jpeg(&[app0(0, 1, 1), sof(0xC1, 12, 10, 10, 3)]);
        let meta = decode(&bytes).unwrap();

        assert_eq!(meta.resolution, None);
        assert_eq!(meta.effective_resolution(), Resolution::default_dpi());
        assert_eq!(meta.compression, CompressionLabel::Dct);
        assert_eq!(meta.bits_per_pixel, 36);
    }

    #[test]
    fn test_first_frame_wins() {
        let bytes = jpeg(&[sof(0xC2, 8, 32, 32, 3), sof(0xC0, 8, 4000, 3000, 1)]);
        let meta = decode(&bytes).unwrap();

        assert_eq!((meta.width, meta.height), (32, 32));
        assert_eq!(meta.compression, CompressionLabel::ProgressiveDct);
    }

    #[test]
    fn test_no_markers_uses_defaults() {
        let meta = decode(&[0xFF, 0xD8, 0x00, 0x01, 0x02, 0xFF, 0xD9]).unwrap();

        assert!(meta.dimensions_unknown);
        assert_eq!((meta.width, meta.height), (0, 0));
        assert_eq!(meta.bits_per_pixel, 24);
        assert!(meta.depth_is_approximate);
        assert_eq!(meta.compression, CompressionLabel::Unknown);
        assert_eq!(meta.effective_resolution().horizontal(), 72);
    }

    #[test]
    fn test_truncated_frame_header() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08, 0x01];
        let err = decode(&bytes).unwrap_err();

        assert_eq!(err.kind(), DecodeErrorKind::TruncatedBuffer);
        assert_eq!(err.offset(), Some(7));
    }

    #[test]
    fn test_deferred_height() {
        let bytes = jpeg(&[sof(0xC0, 8, 100, 0, 3)]);
        let meta = decode(&bytes).unwrap();

        assert!(meta.dimensions_unknown);
        assert_eq!((meta.width, meta.height), (0, 0));
        assert_eq!(meta.bits_per_pixel, 24);
    }
}
