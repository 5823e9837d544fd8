use image::{ImageFormat, Rgba, RgbaImage};
use palette::Srgb;

use crate::error::PaletteError;
use crate::sample::Centroid;

/// Pixel size of one palette cell in the rendered swatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwatchSize {
    pub width: u32,
    pub height: u32,
}

impl Default for SwatchSize {
    fn default() -> Self {
        Self {
            width: 150,
            height: 75,
        }
    }
}

/// Grid of `(columns, rows)` for `n` cells, as close to square as an exact
/// factor pair allows. Falls back to a single row when there is none.
pub fn layout(n: usize) -> (usize, usize) {
    let mut rows = (n as f64).sqrt() as usize;
    while rows > 1 {
        if n % rows == 0 {
            return (n / rows, rows);
        }
        rows -= 1;
    }
    (n, 1)
}

/// Centroid mean as an 8-bit sRGB color.
pub fn to_srgb8(centroid: &Centroid) -> Srgb<u8> {
    let [r, g, b] = centroid.rgb8();
    Srgb::new(r, g, b)
}

/// `RRGGBB` hex string for a palette entry.
pub fn to_hex(centroid: &Centroid) -> String {
    let c = to_srgb8(centroid);
    format!("{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
}

/// Paint one solid cell per palette entry.
///
/// Cells fill the grid column by column: entry `i` lands in column
/// `i / rows`, row `i % rows`.
pub fn render_swatch(palette: &[Centroid], cell: SwatchSize) -> Result<RgbaImage, PaletteError> {
    if palette.is_empty() {
        return Err(PaletteError::EmptyPalette);
    }
    let (columns, rows) = layout(palette.len());
    let width = columns as u32 * cell.width;
    let height = rows as u32 * cell.height;

    let colors: Vec<Rgba<u8>> = palette
        .iter()
        .map(|c| {
            let c = to_srgb8(c);
            Rgba([c.red, c.green, c.blue, 255])
        })
        .collect();

    Ok(RgbaImage::from_fn(width, height, |x, y| {
        let column = (x / cell.width) as usize;
        let row = (y / cell.height) as usize;
        colors[row + column * rows]
    }))
}

/// PNG-encode a rendered swatch.
pub fn encode_png(swatch: &RgbaImage) -> image::ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buf);
        swatch.write_to(&mut cursor, ImageFormat::Png)?;
    }
    Ok(buf)
}
