//! Image acquisition.
//!
//! Turns a [`Source`] into a decoded bitmap plus an [`ImageMetadata`] snapshot.
//!
//! | Source | Size reported | Declared format |
//! |--------|---------------|-----------------|
//! | File | bytes on disk | sniffed from content (`image/png`, …) |
//! | URL | `0` (unknown) | `image/url` |
//! | Sample | `0` | `image/svg+xml` |
//!
//! Formats the decoder understands but distributors reject (GIF, TIFF) still
//! ingest; they simply fail the format rule later.

use crate::sample;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Declared format for images fetched from a URL.
pub const URL_FORMAT: &str = "image/url";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode {label}: {source}")]
    Decode {
        label: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Where an artwork comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
    Sample,
}

impl Source {
    /// Interpret a CLI argument: `sample`, an `http(s)://` URL, or a path.
    pub fn parse(arg: &str) -> Self {
        if arg == "sample" {
            Source::Sample
        } else if arg.starts_with("http://") || arg.starts_with("https://") {
            Source::Url(arg.to_string())
        } else {
            Source::File(PathBuf::from(arg))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
            Source::Sample => f.write_str("sample"),
        }
    }
}

/// Snapshot of the facts validation needs about one ingested image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
    pub declared_format: String,
}

impl ImageMetadata {
    /// `"3000 x 3000px"`, or `"—"` when either side is zero.
    pub fn dimensions_label(&self) -> String {
        if self.width == 0 || self.height == 0 {
            "—".to_string()
        } else {
            format!("{} x {}px", self.width, self.height)
        }
    }

    /// Size in MB with two decimals, or `"—"` when unknown.
    pub fn size_label(&self) -> String {
        if self.size_bytes == 0 {
            "—".to_string()
        } else {
            format!("{:.2} MB", self.size_bytes as f64 / 1024.0 / 1024.0)
        }
    }

    pub fn format_label(&self) -> &str {
        if self.declared_format.is_empty() {
            "—"
        } else {
            &self.declared_format
        }
    }
}

/// A decoded image and its metadata.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub source: Source,
    pub image: DynamicImage,
    pub metadata: ImageMetadata,
}

/// Acquire and decode `source`.
pub fn ingest(source: &Source) -> Result<Ingested, IngestError> {
    let (image, metadata) = match source {
        Source::File(path) => ingest_file(path)?,
        Source::Url(url) => ingest_url(url)?,
        Source::Sample => sample::sample(),
    };
    tracing::debug!(
        source = %source,
        width = metadata.width,
        height = metadata.height,
        format = %metadata.declared_format,
        "Ingested image"
    );
    Ok(Ingested {
        source: source.clone(),
        image,
        metadata,
    })
}

/// MIME type for encoded bytes, sniffed from magic numbers with the file
/// extension as a fallback.
pub fn detect_format(bytes: &[u8], path: Option<&Path>) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .or_else(|| path.and_then(|p| ImageFormat::from_path(p).ok()))
        .map(|f| f.to_mime_type())
}

fn ingest_file(path: &Path) -> Result<(DynamicImage, ImageMetadata), IngestError> {
    let bytes = fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let declared_format = detect_format(&bytes, Some(path))
        .unwrap_or("application/octet-stream")
        .to_string();
    let image = decode(&bytes, &path.display().to_string())?;
    let metadata = ImageMetadata {
        width: image.width(),
        height: image.height(),
        size_bytes: bytes.len() as u64,
        declared_format,
    };
    Ok((image, metadata))
}

fn ingest_url(url: &str) -> Result<(DynamicImage, ImageMetadata), IngestError> {
    let fetch_err = |source| IngestError::Fetch {
        url: url.to_string(),
        source,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(fetch_err)?;
    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(fetch_err)?;
    tracing::debug!(url, bytes = bytes.len(), "Fetched remote image");

    let image = decode(&bytes, url)?;
    let metadata = ImageMetadata {
        width: image.width(),
        height: image.height(),
        size_bytes: 0,
        declared_format: URL_FORMAT.to_string(),
    };
    Ok((image, metadata))
}

fn decode(bytes: &[u8], label: &str) -> Result<DynamicImage, IngestError> {
    image::load_from_memory(bytes).map_err(|source| IngestError::Decode {
        label: label.to_string(),
        source,
    })
}
