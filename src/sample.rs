//! Built-in sample artwork.
//!
//! A 1200×1200 square with a diagonal three-stop gradient (violet → teal →
//! amber) and a translucent dark disc above center. It stands in for vector
//! art, so it is declared as [`SYNTHETIC_FORMAT`] with no byte size.

use crate::ingest::ImageMetadata;
use crate::validate::SYNTHETIC_FORMAT;
use image::{DynamicImage, Rgba, RgbaImage};

pub const SAMPLE_SIZE: u32 = 1200;

const STOPS: [(f32, [u8; 3]); 3] = [
    (0.0, [0x7c, 0x5c, 0xff]),
    (0.5, [0x00, 0xd1, 0xb2]),
    (1.0, [0xff, 0xb1, 0x55]),
];

// Disc geometry in units of the canvas edge.
const DISC_CENTER: (f32, f32) = (0.5, 520.0 / 1200.0);
const DISC_RADIUS: f32 = 0.25;
const DISC_SHADE: f32 = 0.2;

fn gradient_at(t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    let pair = STOPS.windows(2).find(|w| t <= w[1].0).unwrap_or(&STOPS[1..]);
    let (t0, c0) = pair[0];
    let (t1, c1) = pair[pair.len() - 1];
    let local = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
    std::array::from_fn(|i| c0[i] as f32 + (c1[i] as f32 - c0[i] as f32) * local)
}

/// Render the sample at `size × size`.
pub fn render(size: u32) -> RgbaImage {
    let edge = size.max(1) as f32;
    RgbaImage::from_fn(size, size, |x, y| {
        let u = (x as f32 + 0.5) / edge;
        let v = (y as f32 + 0.5) / edge;
        let mut rgb = gradient_at((u + v) / 2.0);

        let (dx, dy) = (u - DISC_CENTER.0, v - DISC_CENTER.1);
        if dx * dx + dy * dy <= DISC_RADIUS * DISC_RADIUS {
            for c in &mut rgb {
                *c *= 1.0 - DISC_SHADE;
            }
        }
        Rgba([
            rgb[0].round() as u8,
            rgb[1].round() as u8,
            rgb[2].round() as u8,
            255,
        ])
    })
}

/// The sample image together with the metadata it is ingested with.
pub fn sample() -> (DynamicImage, ImageMetadata) {
    let image = DynamicImage::ImageRgba8(render(SAMPLE_SIZE));
    let metadata = ImageMetadata {
        width: SAMPLE_SIZE,
        height: SAMPLE_SIZE,
        size_bytes: 0,
        declared_format: SYNTHETIC_FORMAT.to_string(),
    };
    (image, metadata)
}
