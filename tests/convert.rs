use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use jpg2ico::{Capability, ConvertError, Converter, IconDir, IconSizes, ImageCodec, Outcome};
use tempfile::TempDir;

fn converter() -> Converter {
    Converter::new(ImageCodec::default())
}

/// 300x200 colour gradient saved as a JPEG.
fn write_jpeg(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let img = RgbImage::from_fn(300, 200, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    img.save_with_format(&path, ImageFormat::Jpeg).unwrap();
    path
}

/// 256x256 PNG: left half fully transparent, right half opaque red.
fn write_transparent_png(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let img = RgbaImage::from_fn(256, 256, |x, _| {
        if x < 128 { Rgba([0, 0, 0, 0]) } else { Rgba([255, 0, 0, 255]) }
    });
    img.save_with_format(&path, ImageFormat::Png).unwrap();
    path
}

fn decode_largest(ico: &Path) -> RgbaImage {
    image::open(ico).unwrap().to_rgba8()
}

#[test]
fn test_jpeg_produces_six_square_alpha_entries() {
    let dir = TempDir::new().unwrap();
    let src = write_jpeg(dir.path(), "submit.jpg");
    let dest = dir.path().join("icon.ico");

    let converted = converter().convert(&src, &dest).unwrap();
    assert_eq!(converted.destination, dest);

    let icon = IconDir::parse(&std::fs::read(&dest).unwrap()).unwrap();
    let dims: Vec<_> = icon.entries.iter().map(|e| (e.width, e.height)).collect();
    assert_eq!(dims, vec![(256, 256), (128, 128), (64, 64), (48, 48), (32, 32), (16, 16)]);
    assert!(icon.entries.iter().all(|e| e.is_square() && e.has_alpha()));
}

#[test]
fn test_jpeg_alpha_is_opaque() {
    let dir = TempDir::new().unwrap();
    let src = write_jpeg(dir.path(), "submit.jpg");
    let dest = dir.path().join("icon.ico");
    converter().convert(&src, &dest).unwrap();

    let largest = decode_largest(&dest);
    assert_eq!(largest.dimensions(), (256, 256));
    assert!(largest.pixels().all(|p| p[3] == 255));
}

#[test]
fn test_transparent_png_keeps_alpha() {
    let dir = TempDir::new().unwrap();
    let src = write_transparent_png(dir.path(), "logo.png");
    let dest = dir.path().join("logo.ico");
    assert_eq!(converter().run(&src, &dest), Outcome::Succeeded);

    let largest = decode_largest(&dest);
    assert_eq!(largest.get_pixel(10, 128)[3], 0);
    assert_eq!(largest.get_pixel(245, 128)[3], 255);
}

#[test]
fn test_repeated_conversion_is_identical() {
    let dir = TempDir::new().unwrap();
    let src = write_jpeg(dir.path(), "submit.jpg");
    let dest = dir.path().join("icon.ico");

    converter().convert(&src, &dest).unwrap();
    let first = std::fs::read(&dest).unwrap();
    converter().convert(&src, &dest).unwrap();
    let second = std::fs::read(&dest).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_corrupt_source_leaves_destination_alone() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("submit.jpg");
    std::fs::write(&src, b"this is a text file, not a jpeg").unwrap();

    let fresh = dir.path().join("fresh.ico");
    let result = converter().convert(&src, &fresh);
    assert!(matches!(result, Err(ConvertError::Failed(_))));
    assert!(!fresh.exists());

    let existing = dir.path().join("existing.ico");
    std::fs::write(&existing, b"previous icon").unwrap();
    let outcome = converter().run(&src, &existing);
    assert!(matches!(outcome, Outcome::Failed(reason) if reason.contains("submit.jpg")));
    assert_eq!(std::fs::read(&existing).unwrap(), b"previous icon");
}

#[test]
fn test_truncated_jpeg_fails() {
    let dir = TempDir::new().unwrap();
    let full = write_jpeg(dir.path(), "full.jpg");
    let bytes = std::fs::read(&full).unwrap();
    let src = dir.path().join("truncated.jpg");
    std::fs::write(&src, &bytes[..64]).unwrap();

    let dest = dir.path().join("icon.ico");
    assert!(matches!(converter().run(&src, &dest), Outcome::Failed(_)));
    assert!(!dest.exists());
}

#[test]
fn test_missing_source_reported() {
    let dir = TempDir::new().unwrap();
    let dest = dir.path().join("icon.ico");
    let outcome = converter().run(&dir.path().join("submit.jpg"), &dest);
    assert_eq!(outcome, Outcome::MissingSource);
    assert!(!dest.exists());
}

#[test]
fn test_misnamed_source_is_sniffed() {
    let dir = TempDir::new().unwrap();
    let png = write_transparent_png(dir.path(), "logo.png");
    let src = dir.path().join("picture");
    std::fs::rename(&png, &src).unwrap();

    let dest = dir.path().join("icon.ico");
    assert_eq!(converter().run(&src, &dest), Outcome::Succeeded);
}

#[test]
fn test_custom_sizes_upscale_small_source() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("tiny.png");
    RgbaImage::from_pixel(8, 8, Rgba([0, 128, 0, 255]))
        .save_with_format(&src, ImageFormat::Png)
        .unwrap();
    let dest = dir.path().join("tiny.ico");

    let sizes = IconSizes::new([16, 128]).unwrap();
    converter().with_sizes(sizes).convert(&src, &dest).unwrap();

    let icon = IconDir::parse(&std::fs::read(&dest).unwrap()).unwrap();
    let dims: Vec<_> = icon.entries.iter().map(|e| e.width).collect();
    assert_eq!(dims, vec![128, 16]);
    assert_eq!(decode_largest(&dest).dimensions(), (128, 128));
}

#[test]
fn test_png_with_webp_extension_converts() {
    let dir = TempDir::new().unwrap();
    let png = write_transparent_png(dir.path(), "logo.png");
    let src = dir.path().join("logo.webp");
    std::fs::rename(&png, &src).unwrap();

    let dest = dir.path().join("icon.ico");
    assert_eq!(converter().run(&src, &dest), Outcome::Succeeded);
    assert_eq!(IconDir::parse(&std::fs::read(&dest).unwrap()).unwrap().len(), 6);
}

#[test]
fn test_sniffed_format_without_decoder_is_missing_capability() {
    let dir = TempDir::new().unwrap();
    // RIFF/WEBP container header; the webp decoder is not enabled
    let mut webp = Vec::new();
    webp.extend_from_slice(b"RIFF");
    webp.extend_from_slice(&24u32.to_le_bytes());
    webp.extend_from_slice(b"WEBPVP8L");
    webp.extend_from_slice(&[0u8; 20]);
    let src = dir.path().join("picture");
    std::fs::write(&src, &webp).unwrap();

    let dest = dir.path().join("icon.ico");
    let result = converter().convert(&src, &dest);
    assert!(matches!(
        result,
        Err(ConvertError::MissingCapability(Capability::Decoder(ImageFormat::WebP)))
    ));
    assert_eq!(converter().run(&src, &dest), Outcome::MissingCapability);
    assert!(!dest.exists());
}
