//! Distribution requirement checks.
//!
//! Three independent rules, each a pure function of [`ImageMetadata`]:
//!
//! | Rule | Passes when |
//! |------|-------------|
//! | Resolution | `width ≥ min` and `height ≥ min`, or the source is vector art |
//! | File size | `size ≤ max`, or the size is unknown (`0`) |
//! | Format | declared MIME type is allowed, or is the synthetic vector format |
//!
//! An artwork is *ready* when all three pass. Reports are recomputed from
//! scratch for every ingest; nothing here holds state.

use crate::ingest::ImageMetadata;
use serde::{Deserialize, Serialize};

/// MIME type of the built-in vector sample. Always format-valid, and exempt
/// from the resolution rule because vector art scales without loss.
pub const SYNTHETIC_FORMAT: &str = "image/svg+xml";

const MEBIBYTE: u64 = 1024 * 1024;

/// Distribution requirements, configured under `[requirements]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Requirements {
    /// Minimum width and height in pixels.
    pub min_dimension: u32,
    /// Maximum encoded size in bytes.
    pub max_file_size_bytes: u64,
    /// Accepted MIME types.
    pub allowed_formats: Vec<String>,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            min_dimension: 3000,
            max_file_size_bytes: 10 * MEBIBYTE,
            allowed_formats: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

impl Requirements {
    fn allows(&self, format: &str) -> bool {
        format == SYNTHETIC_FORMAT || self.allowed_formats.iter().any(|f| f == format)
    }

    fn resolution_label(&self) -> String {
        format!("Resolution {0}x{0} minimum", self.min_dimension)
    }

    fn size_label(&self) -> String {
        let max = self.max_file_size_bytes;
        if max % MEBIBYTE == 0 {
            format!("File size ≤ {}MB", max / MEBIBYTE)
        } else {
            format!("File size ≤ {:.1}MB", max as f64 / MEBIBYTE as f64)
        }
    }

    fn format_label(&self) -> String {
        let names: Vec<String> = self
            .allowed_formats
            .iter()
            .map(|mime| short_format_name(mime))
            .collect();
        format!("Format {}", names.join("/"))
    }
}

/// Display name for a MIME type: `image/jpeg` → `JPG`, `image/webp` → `WebP`.
pub fn short_format_name(mime: &str) -> String {
    match mime {
        "image/jpeg" => "JPG".to_string(),
        "image/webp" => "WebP".to_string(),
        other => other
            .rsplit('/')
            .next()
            .unwrap_or(other)
            .to_ascii_uppercase(),
    }
}

/// Per-rule outcome plus the aggregate readiness flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub resolution_ok: bool,
    pub size_ok: bool,
    pub format_ok: bool,
    pub ready: bool,
}

/// One labelled row of a report, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationRow {
    pub label: String,
    pub ok: bool,
}

impl ValidationRow {
    pub fn status(&self) -> &'static str {
        if self.ok { "Pass" } else { "Review" }
    }
}

/// Aggregate status shown next to the artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Ready,
    NeedsOptimization,
    LoadFailed,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::Ready => "Ready for distribution",
            Badge::NeedsOptimization => "Needs optimization",
            Badge::LoadFailed => "URL load failed",
        }
    }

    pub fn is_warning(self) -> bool {
        self != Badge::Ready
    }
}

impl ValidationReport {
    /// The three rule rows, labelled from the requirements they were checked against.
    pub fn rows(&self, requirements: &Requirements) -> [ValidationRow; 3] {
        [
            ValidationRow {
                label: requirements.resolution_label(),
                ok: self.resolution_ok,
            },
            ValidationRow {
                label: requirements.size_label(),
                ok: self.size_ok,
            },
            ValidationRow {
                label: requirements.format_label(),
                ok: self.format_ok,
            },
        ]
    }

    pub fn badge(&self) -> Badge {
        if self.ready {
            Badge::Ready
        } else {
            Badge::NeedsOptimization
        }
    }
}

/// Check `metadata` against `requirements`.
pub fn validate(metadata: &ImageMetadata, requirements: &Requirements) -> ValidationReport {
    let is_vector = metadata.declared_format == SYNTHETIC_FORMAT;
    let resolution_ok = is_vector
        || (metadata.width >= requirements.min_dimension
            && metadata.height >= requirements.min_dimension);
    let size_ok =
        metadata.size_bytes == 0 || metadata.size_bytes <= requirements.max_file_size_bytes;
    let format_ok = requirements.allows(&metadata.declared_format);

    ValidationReport {
        resolution_ok,
        size_ok,
        format_ok,
        ready: resolution_ok && size_ok && format_ok,
    }
}
