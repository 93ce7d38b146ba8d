use std::path::PathBuf;

use image::Rgb;

use super::*;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join("scrawl-encode-tests")
        .join(format!("{}-{name}", std::process::id()))
}

fn page() -> RgbImage {
    let mut img = RgbImage::from_pixel(32, 24, Rgb([255, 255, 255]));
    for x in 0..32 {
        img.put_pixel(x, 12, Rgb([0, 51, 153]));
    }
    img
}

#[test]
fn dpi_converts_to_pixels_per_metre() {
    assert_eq!(dpi_to_ppm(300), 11811);
    assert_eq!(dpi_to_ppm(72), 2835);
}

#[test]
fn png_carries_phys_chunk_and_pixels() {
    let path = scratch("nested/dir/page.png");
    let _ = std::fs::remove_file(&path);
    save_page(&page(), &path, &OutputConfig::default()).unwrap();

    let decoder = png::Decoder::new(std::fs::File::open(&path).unwrap());
    let reader = decoder.read_info().unwrap();
    let dims = reader.info().pixel_dims.unwrap();
    assert_eq!(dims.xppu, 11811);
    assert_eq!(dims.yppu, 11811);
    assert_eq!(dims.unit, png::Unit::Meter);

    let back = image::open(&path).unwrap().to_rgb8();
    assert_eq!(back.as_raw(), page().as_raw());
}

#[test]
fn jpeg_writes_jfif_density() {
    let path = scratch("page.jpg");
    let output = OutputConfig {
        format: OutputFormat::Jpeg,
        dpi: 150,
        quality: 80,
    };
    save_page(&page(), &path, &output).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    let jfif = bytes
        .windows(5)
        .position(|w| w == b"JFIF\0")
        .expect("JFIF segment");
    // version (2 bytes), units, x density, y density
    assert_eq!(bytes[jfif + 7], 1);
    assert_eq!(u16::from_be_bytes([bytes[jfif + 8], bytes[jfif + 9]]), 150);

    let back = image::open(&path).unwrap();
    assert_eq!((back.width(), back.height()), (32, 24));
}

#[test]
fn unwritable_path_is_an_error() {
    let blocker = scratch("blocker");
    std::fs::create_dir_all(blocker.parent().unwrap()).unwrap();
    std::fs::write(&blocker, b"file").unwrap();

    let err = save_page(&page(), &blocker.join("page.png"), &OutputConfig::default()).unwrap_err();
    assert!(matches!(err, ScrawlError::Other(_)));
}

#[test]
fn failed_encode_leaves_no_file() {
    let path = scratch("empty/page.png");
    let _ = std::fs::remove_file(&path);

    let err = save_page(&RgbImage::new(0, 0), &path, &OutputConfig::default()).unwrap_err();
    assert!(matches!(err, ScrawlError::Encode(_)), "{err}");
    assert!(!path.exists());
}
