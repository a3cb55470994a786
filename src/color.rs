use std::collections::HashMap;

use image::RgbaImage;

/// A single representative color, used for cosmetic theming only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Computes zero or one dominant color from a fully decoded raster image.
/// Never participates in fetch error state; an image with no usable palette
/// simply yields `None`.
pub trait ColorExtractor: Send + Sync {
    fn dominant_color(&self, image: &RgbaImage) -> Option<Rgb>;
}

/// Quantized-histogram extractor: opaque pixels are sampled on a stride,
/// bucketed at 5 bits per channel, and the mean color of the most populated
/// bucket wins.
pub struct PaletteExtractor {
    /// Longest image dimension after stride sampling.
    sample_dimension: u32,
}

impl Default for PaletteExtractor {
    fn default() -> Self {
        Self {
            sample_dimension: 64,
        }
    }
}

const OPAQUE_THRESHOLD: u8 = 128;

#[derive(Default)]
struct Bucket {
    count: u64,
    r: u64,
    g: u64,
    b: u64,
}

impl ColorExtractor for PaletteExtractor {
    fn dominant_color(&self, image: &RgbaImage) -> Option<Rgb> {
        let longest = image.width().max(image.height());
        let stride = (longest / self.sample_dimension).max(1);

        let mut buckets: HashMap<(u8, u8, u8), Bucket> = HashMap::new();
        for y in (0..image.height()).step_by(stride as usize) {
            for x in (0..image.width()).step_by(stride as usize) {
                let [r, g, b, a] = image.get_pixel(x, y).0;
                if a < OPAQUE_THRESHOLD {
                    continue;
                }
                let bucket = buckets.entry((r >> 3, g >> 3, b >> 3)).or_default();
                bucket.count += 1;
                bucket.r += u64::from(r);
                bucket.g += u64::from(g);
                bucket.b += u64::from(b);
            }
        }

        let dominant = buckets.into_values().max_by_key(|bucket| bucket.count)?;
        Some(Rgb {
            r: (dominant.r / dominant.count) as u8,
            g: (dominant.g / dominant.count) as u8,
            b: (dominant.b / dominant.count) as u8,
        })
    }
}
