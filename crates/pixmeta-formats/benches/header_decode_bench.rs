use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use image::DynamicImage;
use pixmeta_common::MediaFormat;
use pixmeta_formats::decode_header;
use std::hint::black_box;
use std::io::Cursor;

fn encode(img: &DynamicImage, format: image::ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn benchmark_headers(c: &mut Criterion) {
    // Sizes chosen so the JPEG scan has real entropy data to walk past
    let sizes = vec![(512, 512, "512x512"), (1920, 1080, "1080p")];

    for (width, height, label) in sizes {
        let img = DynamicImage::new_rgb8(width, height);

        for (format, image_format) in [
            (MediaFormat::Jpeg, image::ImageFormat::Jpeg),
            (MediaFormat::Png, image::ImageFormat::Png),
            (MediaFormat::Bmp, image::ImageFormat::Bmp),
        ] {
            let bytes = encode(&img, image_format);

            c.bench_with_input(
                BenchmarkId::new(format!("{format} header"), label),
                &bytes,
                |b, bytes| {
                    b.iter(|| decode_header(black_box(format), black_box(bytes)));
                },
            );
        }
    }
}

criterion_group!(benches, benchmark_headers);
criterion_main!(benches);
