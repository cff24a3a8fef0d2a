// End-to-end inspection of files written by the image crate
use image::DynamicImage;
use pixmeta_common::MediaFormat;
use pixmeta_core::{FileInput, Inspector};
use pixmeta_formats::{CompressionLabel, Resolution};
use pixmeta_metrics::Classification;
use std::path::PathBuf;
use tempfile::TempDir;

fn save(dir: &TempDir, name: &str, img: &DynamicImage) -> PathBuf {
    let path = dir.path().join(name);
    img.save(&path).unwrap();
    path
}

/// 8-bit single-plane PCX, 300 dpi, window 0..=79 x 0..=59
fn pcx_bytes() -> Vec<u8> {
    let mut out = vec![0u8; 128];
    out[0] = 0x0A;
    out[1] = 5;
    out[2] = 1;
    out[3] = 8;
    out[8..10].copy_from_slice(&79u16.to_le_bytes());
    out[10..12].copy_from_slice(&59u16.to_le_bytes());
    out[12..14].copy_from_slice(&300u16.to_le_bytes());
    out[14..16].copy_from_slice(&300u16.to_le_bytes());
    out[65] = 1;
    // a few RLE runs stand in for the pixel data
    out.extend_from_slice(&[0xFF, 0x00].repeat(32));
    out
}

#[tokio::test]
async fn test_png_rgba() {
    let temp_dir = TempDir::new().unwrap();
    let path = save(&temp_dir, "alpha.png", &DynamicImage::new_rgba8(300, 200));

    let outcome = Inspector::new().inspect_path(&path).await.unwrap();
    let inspection = outcome.inspection().expect("PNG should inspect");
    let meta = &inspection.metadata;

    assert_eq!(meta.format, MediaFormat::Png);
    assert_eq!((meta.width, meta.height), (300, 200));
    assert_eq!(meta.bits_per_pixel, 32);
    assert_eq!(meta.compression, CompressionLabel::Deflate);
    assert_eq!(meta.effective_resolution(), Resolution::default_dpi());

    let metrics = inspection.report.metrics().unwrap();
    assert_eq!(metrics.raw_size_bytes, 240_000);
    assert_eq!(metrics.stored_size_bytes, outcome.key.size);
    assert_eq!(metrics.classification, Classification::Compressed);
}

#[tokio::test]
async fn test_baseline_jpeg() {
    let temp_dir = TempDir::new().unwrap();
    let path = save(&temp_dir, "photo.jpg", &DynamicImage::new_rgb8(640, 480));

    let outcome = Inspector::new().inspect_path(&path).await.unwrap();
    let meta = &outcome.inspection().unwrap().metadata;

    assert_eq!(meta.format, MediaFormat::Jpeg);
    assert_eq!((meta.width, meta.height), (640, 480));
    assert!(!meta.dimensions_unknown);
    assert_eq!(meta.bits_per_pixel, 24);
    assert_eq!(meta.compression, CompressionLabel::BaselineDct);
}

#[tokio::test]
async fn test_bmp_rgb() {
    let temp_dir = TempDir::new().unwrap();
    let path = save(&temp_dir, "scan.bmp", &DynamicImage::new_rgb8(120, 80));

    let outcome = Inspector::new().inspect_path(&path).await.unwrap();
    let inspection = outcome.inspection().unwrap();

    assert_eq!(
        (inspection.metadata.width, inspection.metadata.height),
        (120, 80)
    );
    assert_eq!(inspection.metadata.bits_per_pixel, 24);
    assert_eq!(inspection.metadata.compression, CompressionLabel::Uncompressed);

    // an uncompressed bitmap is never smaller than its pixels
    let metrics = inspection.report.metrics().unwrap();
    assert_eq!(metrics.raw_size_bytes, 28_800);
    assert_ne!(metrics.classification, Classification::Compressed);
}

#[tokio::test]
async fn test_gif() {
    let temp_dir = TempDir::new().unwrap();
    let path = save(&temp_dir, "anim.gif", &DynamicImage::new_rgba8(64, 32));

    let outcome = Inspector::new().inspect_path(&path).await.unwrap();
    let meta = &outcome.inspection().unwrap().metadata;

    assert_eq!((meta.width, meta.height), (64, 32));
    assert_eq!(meta.bits_per_pixel, 8);
    assert_eq!(meta.compression, CompressionLabel::Lzw);
    assert!(meta.palette_colors.is_some());
}

#[tokio::test]
async fn test_tiff_dimensions_are_resolved() {
    let temp_dir = TempDir::new().unwrap();
    let path = save(&temp_dir, "page.tiff", &DynamicImage::new_rgb8(37, 21));

    let outcome = Inspector::new().inspect_path(&path).await.unwrap();
    let meta = &outcome.inspection().unwrap().metadata;

    assert_eq!(meta.format, MediaFormat::Tiff);
    assert_eq!((meta.width, meta.height), (37, 21));
    assert!(!meta.dimensions_unknown);
    assert!(meta.depth_is_approximate);
    assert_eq!(meta.compression, CompressionLabel::ContainerDelegated);
}

#[tokio::test]
async fn test_pcx() {
    let input = FileInput::new("legacy.pcx", pcx_bytes());
    let outcome = Inspector::new().inspect(&input).await;
    let meta = &outcome.inspection().unwrap().metadata;

    assert_eq!((meta.width, meta.height), (80, 60));
    assert_eq!(meta.bits_per_pixel, 8);
    assert_eq!(meta.resolution, Some(Resolution::per_axis(300, 300)));
    assert_eq!(meta.compression, CompressionLabel::Rle);
}

#[tokio::test]
async fn test_mime_only_upload() {
    let temp_dir = TempDir::new().unwrap();
    let path = save(&temp_dir, "upload.png", &DynamicImage::new_rgb8(10, 10));
    let bytes = std::fs::read(&path).unwrap();

    let input = FileInput::new("upload", bytes).with_mime("image/png; charset=binary");
    let outcome = Inspector::new().inspect(&input).await;

    assert_eq!(
        outcome.inspection().unwrap().metadata.format,
        MediaFormat::Png
    );
}

#[tokio::test]
async fn test_mislabelled_file_fails_softly() {
    let temp_dir = TempDir::new().unwrap();
    let jpeg = save(&temp_dir, "real.jpg", &DynamicImage::new_rgb8(16, 16));
    let renamed = temp_dir.path().join("fake.png");
    std::fs::rename(&jpeg, &renamed).unwrap();

    let outcome = Inspector::new().inspect_path(&renamed).await.unwrap();

    assert!(!outcome.is_success());
    assert!(outcome.error().is_some());
}
