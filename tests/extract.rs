use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use image_to_palette_wasm::{
    extract_palette_bytes, extract_palette_file, PaletteConfig, SwatchSize,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn black_and_white_png() -> Vec<u8> {
    // Top row black, bottom row white.
    let img = ImageBuffer::from_fn(2, 2, |_, y| {
        if y == 0 {
            Rgb([0u16, 0, 0])
        } else {
            Rgb([65535u16, 65535, 65535])
        }
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgb16(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode test image");
    buf
}

/// A seed whose first two centroid picks hit one black and one white pixel.
fn splitting_seed() -> u64 {
    (0..)
        .find(|&seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let a = rng.random_range(0..4usize);
            let b = rng.random_range(0..4usize);
            (a < 2) != (b < 2)
        })
        .unwrap()
}

#[test]
fn two_by_two_image_splits_into_black_and_white() {
    let config = PaletteConfig {
        clusters: 2,
        brightening: 0,
        max_iterations: Some(100),
        seed: Some(splitting_seed()),
    };
    let (png, palette) =
        extract_palette_bytes(&black_and_white_png(), &config, SwatchSize::default())
            .expect("extraction succeeds");

    assert_eq!(palette.len(), 2);
    assert!(palette.iter().all(|c| c.members() == 2));
    assert!(palette.iter().any(|c| c.mean() == [0, 0, 0]));
    assert!(palette.iter().any(|c| c.mean() == [65535, 65535, 65535]));

    let swatch = image::load_from_memory(&png).expect("decode swatch").to_rgba8();
    // Two entries lay out as two columns in one row.
    assert_eq!(swatch.dimensions(), (300, 75));
    let left = swatch.get_pixel(0, 0).0;
    let right = swatch.get_pixel(299, 74).0;
    assert_eq!(left[..3], palette[0].rgb8());
    assert_eq!(right[..3], palette[1].rgb8());
    assert_ne!(left, right);
}

#[test]
fn same_seed_is_reproducible() {
    let input = black_and_white_png();
    let config = PaletteConfig {
        clusters: 2,
        brightening: 2,
        max_iterations: Some(1000),
        seed: Some(2024),
    };
    let (png_a, palette_a) =
        extract_palette_bytes(&input, &config, SwatchSize::default()).unwrap();
    let (png_b, palette_b) =
        extract_palette_bytes(&input, &config, SwatchSize::default()).unwrap();
    assert_eq!(palette_a, palette_b);
    assert_eq!(png_a, png_b);
}

#[test]
fn writes_swatch_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("input.png");
    let output = dir.path().join("nested").join("colorSample.png");
    std::fs::write(&input, black_and_white_png()).unwrap();

    let config = PaletteConfig {
        clusters: 2,
        brightening: 1,
        max_iterations: Some(1000),
        seed: Some(5),
    };
    let cell = SwatchSize {
        width: 10,
        height: 5,
    };
    let palette = extract_palette_file(&input, &output, &config, cell).expect("extract");

    assert_eq!(palette.len(), 2);
    let written = image::open(&output).expect("swatch written");
    assert_eq!((written.width(), written.height()), (20, 5));
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = extract_palette_file(
        &dir.path().join("does-not-exist.png"),
        &dir.path().join("out.png"),
        &PaletteConfig::default(),
        SwatchSize::default(),
    );
    assert!(result.is_err());
    assert!(!dir.path().join("out.png").exists());
}

#[test]
fn undecodable_input_is_an_error() {
    let err = extract_palette_bytes(b"not an image", &PaletteConfig::default(), SwatchSize::default())
        .unwrap_err();
    assert!(err.to_string().contains("unable to decode image"));
}
