//! Palette extraction.
//!
//! Reduces an arbitrary decoded image to at most five representative colors.
//!
//! ## Algorithm
//!
//! ```text
//! image (any size) ──resize_exact──▶ S×S grid ──quantize──▶ buckets ──rank──▶ top N
//! ```
//!
//! 1. **Resample** to a fixed `S × S` grid (default 50) with bilinear
//!    (`Triangle`) filtering. Work is bounded by `S²` samples no matter how
//!    large the source is; smaller sources are upscaled.
//! 2. **Quantize** every channel to the nearest multiple of `Q` (default 32),
//!    rounding halves up. At most `(256 / Q)³` buckets survive. The topmost
//!    bucket (`256`) is clamped to `255` so swatches stay 24-bit.
//! 3. **Count** pixels per bucket. Alpha is ignored: a fully transparent pixel
//!    still votes for its underlying RGB.
//! 4. **Rank** by descending count. The sort is stable, so on a tie the bucket
//!    seen first (row-major) wins.
//!
//! An image with nothing to sample yields [`Palette::default`], so a palette is
//! never empty.

use crate::config::PaletteConfig;
use image::DynamicImage;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on the number of swatches in a [`Palette`].
pub const MAX_SWATCHES: usize = 5;

/// Fallback palette used when extraction has no pixels to work with.
pub const DEFAULT_SWATCHES: [ColorSwatch; MAX_SWATCHES] = [
    ColorSwatch::new(0x14, 0x15, 0x26),
    ColorSwatch::new(0x5b, 0x4b, 0x8a),
    ColorSwatch::new(0x00, 0xd1, 0xb2),
    ColorSwatch::new(0xff, 0xb1, 0x55),
    ColorSwatch::new(0xf5, 0xf5, 0xf5),
];

/// Label color placed on light swatches.
pub const DARK_TEXT: ColorSwatch = ColorSwatch::new(0x1c, 0x23, 0x33);
/// Label color placed on dark swatches.
pub const LIGHT_TEXT: ColorSwatch = ColorSwatch::new(0xf5, 0xf5, 0xf5);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex color '{0}' (expected #rrggbb)")]
pub struct ParseSwatchError(pub String);

/// A 24-bit RGB color. Serializes as a lowercase `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ColorSwatch {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSwatch {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Perceptual luma (BT.601 weights) scaled by 1000, kept integral so
    /// brightness thresholds compare exactly.
    pub fn luma_milli(self) -> u32 {
        299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32
    }

    /// Non-linearized BT.709 luminance in `[0, 1]`, used to pick label text.
    pub fn display_luminance(self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }

    /// WCAG 2 relative luminance (linearized sRGB).
    pub fn relative_luminance(self) -> f64 {
        fn linear(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

impl fmt::Display for ColorSwatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl FromStr for ColorSwatch {
    type Err = ParseSwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseSwatchError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ParseSwatchError(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<ColorSwatch> for String {
    fn from(swatch: ColorSwatch) -> Self {
        swatch.hex()
    }
}

impl TryFrom<String> for ColorSwatch {
    type Error = ParseSwatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Pick a readable label color for text drawn on top of `swatch`.
pub fn contrasting_text(swatch: ColorSwatch) -> ColorSwatch {
    if swatch.display_luminance() > 0.5 {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

/// Ordered, non-empty list of up to [`MAX_SWATCHES`] colors, most frequent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Palette(Vec<ColorSwatch>);

impl Palette {
    /// Build a palette from ranked swatches. Returns `None` for an empty list;
    /// anything past [`MAX_SWATCHES`] is dropped.
    pub fn new(mut swatches: Vec<ColorSwatch>) -> Option<Self> {
        if swatches.is_empty() {
            return None;
        }
        swatches.truncate(MAX_SWATCHES);
        Some(Self(swatches))
    }

    pub fn swatches(&self) -> &[ColorSwatch] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorSwatch> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most frequent color.
    pub fn dominant(&self) -> ColorSwatch {
        self.0[0]
    }

    /// Label color for text on the dominant swatch.
    pub fn text_color(&self) -> ColorSwatch {
        contrasting_text(self.dominant())
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_SWATCHES
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_SWATCHES.to_vec())
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let swatches = Vec::<ColorSwatch>::deserialize(deserializer)?;
        Palette::new(swatches).ok_or_else(|| serde::de::Error::custom("palette must not be empty"))
    }
}

/// Extract a palette with the stock settings (50×50 grid, step 32, 5 swatches).
pub fn extract(image: &DynamicImage) -> Palette {
    extract_with(image, &PaletteConfig::default())
}

/// Extract a palette using explicit sampling settings.
pub fn extract_with(image: &DynamicImage, config: &PaletteConfig) -> Palette {
    let size = config.sample_size;
    if image.width() == 0 || image.height() == 0 || size == 0 {
        return Palette::default();
    }

    let grid = image.resize_exact(size, size, FilterType::Triangle).to_rgba8();
    let ranked = rank_buckets(
        grid.pixels().map(|p| [p[0], p[1], p[2]]),
        config.quantization_step,
    );

    let swatches = ranked
        .into_iter()
        .take(config.max_swatches.min(MAX_SWATCHES))
        .map(|([r, g, b], _)| ColorSwatch::new(r, g, b))
        .collect();
    Palette::new(swatches).unwrap_or_default()
}

/// Round `channel` to the nearest multiple of `step`, halves up, capped at 255.
pub(crate) fn quantize(channel: u8, step: u32) -> u8 {
    let step = step.max(1);
    let rounded = (channel as u32 + step / 2) / step * step;
    rounded.min(255) as u8
}

/// Count quantized colors and rank them by descending frequency.
///
/// Ties keep first-seen order.
pub(crate) fn rank_buckets(
    pixels: impl Iterator<Item = [u8; 3]>,
    step: u32,
) -> Vec<([u8; 3], u32)> {
    let mut buckets: Vec<([u8; 3], u32)> = Vec::new();
    let mut index: HashMap<[u8; 3], usize> = HashMap::new();

    for [r, g, b] in pixels {
        let key = [quantize(r, step), quantize(g, step), quantize(b, step)];
        match index.get(&key) {
            Some(&slot) => buckets[slot].1 += 1,
            None => {
                index.insert(key, buckets.len());
                buckets.push((key, 1));
            }
        }
    }

    buckets.sort_by(|a, b| b.1.cmp(&a.1));
    buckets
}
