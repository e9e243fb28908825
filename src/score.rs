//! Heuristic quality scores derived from a palette.
//!
//! - **Brightness**: mean BT.601 luma over the swatches, each weighted equally.
//! - **Overall score**: `clamp(round(90 - |brightness - 128| / 4), 72, 98)`.
//!   Peaks at mid-gray and falls off symmetrically.
//! - **Contrast**: see [`ContrastMode`].
//! - **Mood**: a coarse tag split at brightness 140 (exclusive).

use crate::palette::Palette;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const RADIANT_MOOD: &str = "Radiant · Uplifting · Warm";
pub const MOODY_MOOD: &str = "Moody · Cinematic · Midnight";

const MIN_SCORE: i32 = 72;
const MAX_SCORE: i32 = 98;
const MOOD_THRESHOLD: f64 = 140.0;

/// How the contrast figure is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContrastMode {
    /// WCAG 2 contrast ratio between the darkest and lightest swatch.
    #[default]
    Wcag,
    /// A random mock value in `[4.0, 6.0)`; not derived from the image.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub overall_score: i32,
    pub contrast_display: String,
    pub mood_label: String,
    pub brightness: f64,
}

/// Mean perceptual brightness of the palette, in `[0, 255]`.
pub fn brightness(palette: &Palette) -> f64 {
    let total: u32 = palette.iter().map(|s| s.luma_milli()).sum();
    total as f64 / (1000.0 * palette.len() as f64)
}

pub fn overall_score(brightness: f64) -> i32 {
    let raw = (90.0 - (brightness - 128.0).abs() / 4.0).round() as i32;
    raw.clamp(MIN_SCORE, MAX_SCORE)
}

pub fn mood_label(brightness: f64) -> &'static str {
    if brightness > MOOD_THRESHOLD {
        RADIANT_MOOD
    } else {
        MOODY_MOOD
    }
}

/// WCAG contrast ratio between the darkest and lightest swatch, in `[1, 21]`.
pub fn palette_contrast_ratio(palette: &Palette) -> f64 {
    let (darkest, lightest) = palette.iter().map(|s| s.relative_luminance()).fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), l| (lo.min(l), hi.max(l)),
    );
    (lightest + 0.05) / (darkest + 0.05)
}

fn format_ratio(ratio: f64) -> String {
    format!("{ratio:.1}:1")
}

/// Score a palette, drawing placeholder contrast from the thread-local RNG.
pub fn score(palette: &Palette, mode: ContrastMode) -> ScoreResult {
    score_with_rng(palette, mode, &mut rand::thread_rng())
}

/// Score a palette with an explicit RNG (only consulted in placeholder mode).
pub fn score_with_rng<R: Rng>(
    palette: &Palette,
    mode: ContrastMode,
    rng: &mut R,
) -> ScoreResult {
    let brightness = brightness(palette);
    let ratio = match mode {
        ContrastMode::Wcag => palette_contrast_ratio(palette),
        ContrastMode::Placeholder => rng.gen_range(4.0..6.0),
    };

    ScoreResult {
        overall_score: overall_score(brightness),
        contrast_display: format_ratio(ratio),
        mood_label: mood_label(brightness).to_string(),
        brightness,
    }
}
