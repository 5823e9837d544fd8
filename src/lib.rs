use wasm_bindgen::prelude::*;
use image::DynamicImage;
use js_sys::{Uint8Array, Array, Object, Reflect};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::info;
#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, Result};
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

pub mod assign;
pub mod brighten;
pub mod cluster;
pub mod error;
pub mod rank;
pub mod sample;
pub mod swatch;

pub use error::PaletteError;
pub use sample::{Centroid, CentroidId, Sample};
pub use swatch::SwatchSize;

/// Knobs for one palette extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteConfig {
    /// Number of palette entries (`k`).
    pub clusters: usize,
    /// How many brightening levels to run after the first clustering.
    pub brightening: usize,
    /// Give up with `DidNotConverge` after this many passes. `None` runs
    /// until convergence.
    pub max_iterations: Option<usize>,
    /// Seed for picking initial centroids. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            clusters: 10,
            brightening: 1,
            max_iterations: None,
            seed: None,
        }
    }
}

impl PaletteConfig {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// One sample per pixel, row by row, with channels widened to 16 bits.
pub fn samples_from_image(img: &DynamicImage) -> Vec<Sample> {
    img.to_rgb16()
        .pixels()
        .map(|p| Sample::from_rgb16(p.0))
        .collect()
}

/// Cluster, rank by size, then brighten.
///
/// The samples' centroid handles end up pointing into the returned palette
/// (or nowhere); their order may be regrouped by brightening.
pub fn build_palette<R: Rng + ?Sized>(
    samples: &mut [Sample],
    config: &PaletteConfig,
    rng: &mut R,
) -> Result<Vec<Centroid>, PaletteError> {
    let centroids = cluster::cluster_samples(samples, config.clusters, config.max_iterations, rng)?;
    let ranked = rank::rank(centroids);
    let palette = brighten::brighten(samples, ranked, config.brightening, config.max_iterations, rng)?;
    info!(
        samples = samples.len(),
        colors = palette.len(),
        brightening = config.brightening,
        "palette extracted"
    );
    Ok(palette)
}

/// Extract a palette from an encoded image.
///
/// Returns `{ image, palette }`: a PNG swatch with one cell per palette
/// entry, and the entries as `RRGGBB` strings in palette order.
#[wasm_bindgen]
pub fn extract_palette(
    input: Vec<u8>,
    n_colors: usize,
    brightening: usize,
    seed: Option<u64>,
) -> Result<Object, JsValue> {
    let img = image::load_from_memory(&input)
        .map_err(|e| JsValue::from_str(&format!("Unable to decode image: {e}")))?;

    let config = PaletteConfig {
        clusters: n_colors,
        brightening,
        seed,
        ..PaletteConfig::default()
    };
    let mut samples = samples_from_image(&img);
    let palette = build_palette(&mut samples, &config, &mut config.rng())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let swatch = swatch::render_swatch(&palette, SwatchSize::default())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let encoded = swatch::encode_png(&swatch)
        .map_err(|e| JsValue::from_str(&format!("PNG encode error: {e}")))?;

    let img_js = Uint8Array::from(encoded.as_slice());
    let palette_js = Array::new();
    for centroid in &palette {
        palette_js.push(&JsValue::from_str(&swatch::to_hex(centroid)));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("image"), &img_js)?;
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;

    Ok(result)
}

/// Native counterpart of [`extract_palette`]: returns the PNG swatch bytes
/// and the palette itself.
#[cfg(not(target_arch = "wasm32"))]
pub fn extract_palette_bytes(
    input: &[u8],
    config: &PaletteConfig,
    cell: SwatchSize,
) -> Result<(Vec<u8>, Vec<Centroid>)> {
    let img = image::load_from_memory(input).context("unable to decode image")?;
    let mut samples = samples_from_image(&img);
    let palette = build_palette(&mut samples, config, &mut config.rng())?;

    let swatch = swatch::render_swatch(&palette, cell)?;
    let png = swatch::encode_png(&swatch).context("PNG encode error")?;
    Ok((png, palette))
}

/// Read `input`, extract its palette and write the swatch PNG to `output`.
#[cfg(not(target_arch = "wasm32"))]
pub fn extract_palette_file(
    input: &Path,
    output: &Path,
    config: &PaletteConfig,
    cell: SwatchSize,
) -> Result<Vec<Centroid>> {
    let bytes = std::fs::read(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let (png, palette) = extract_palette_bytes(&bytes, config, cell)
        .with_context(|| format!("palette extraction failed for {}", input.display()))?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output, png)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn samples_follow_row_major_order() {
        let img = ImageBuffer::from_fn(2, 2, |x, y| Rgb([x as u16 * 1000, y as u16 * 1000, 7u16]));
        let samples = samples_from_image(&DynamicImage::ImageRgb16(img));
        let rgb: Vec<[u16; 3]> = samples.iter().map(Sample::rgb).collect();
        assert_eq!(
            rgb,
            vec![[0, 0, 7], [1000, 0, 7], [0, 1000, 7], [1000, 1000, 7]]
        );
    }

    #[test]
    fn eight_bit_pixels_widen_to_sixteen() {
        let img = ImageBuffer::from_pixel(1, 1, Rgb([255u8, 1, 0]));
        let samples = samples_from_image(&DynamicImage::ImageRgb8(img));
        assert_eq!(samples[0].rgb(), [65535, 257, 0]);
    }

    #[test]
    fn default_config_matches_cli_defaults() {
        let config = PaletteConfig::default();
        assert_eq!(config.clusters, 10);
        assert_eq!(config.brightening, 1);
        assert_eq!(config.max_iterations, None);
    }

    #[test]
    fn build_palette_rejects_empty_input() {
        let config = PaletteConfig {
            seed: Some(1),
            ..PaletteConfig::default()
        };
        let err = build_palette(&mut [], &config, &mut config.rng()).unwrap_err();
        assert_eq!(err, PaletteError::EmptySamples);
    }

    #[test]
    fn build_palette_keeps_requested_size() {
        let mut samples: Vec<Sample> = (0..50u32)
            .map(|i| Sample::from_rgb16([(i * 1300) as u16, (65535 - i * 1200) as u16, (i * i) as u16]))
            .collect();
        let config = PaletteConfig {
            clusters: 4,
            brightening: 2,
            seed: Some(17),
            ..PaletteConfig::default()
        };
        let palette = build_palette(&mut samples, &config, &mut config.rng()).unwrap();
        assert_eq!(palette.len(), 4);
    }
}
