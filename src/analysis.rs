//! The per-image pipeline.
//!
//! ```text
//!            ┌─▶ validate ───────────────▶ report
//! ingest ────┤
//!            └─▶ palette::extract ─▶ score ▶ palette + scores
//! ```
//!
//! Both branches read the same decoded image and never influence each
//! other. Batches fan out over rayon; results come back in input order.

use crate::config::ArtcheckConfig;
use crate::ingest::{self, ImageMetadata, IngestError, Ingested, Source};
use crate::palette::{self, ColorSwatch, Palette};
use crate::score::{self, ScoreResult};
use crate::validate::{self, Badge, ValidationReport, ValidationRow};
use image::DynamicImage;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use walkdir::WalkDir;

/// File extensions picked up when a directory is checked.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "tif", "tiff"];

/// Everything derived from one ingested image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub source: String,
    pub metadata: ImageMetadata,
    pub report: ValidationReport,
    pub rows: [ValidationRow; 3],
    pub badge: Badge,
    pub palette: Palette,
    pub text_color: ColorSwatch,
    pub score: ScoreResult,
}

/// An analysis together with the image it was computed from.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub analysis: Analysis,
    pub image: DynamicImage,
}

pub fn analyze(ingested: &Ingested, config: &ArtcheckConfig) -> Analysis {
    let report = validate::validate(&ingested.metadata, &config.requirements);
    let palette = palette::extract_with(&ingested.image, &config.palette);
    let score = score::score(&palette, config.scoring.contrast);

    tracing::debug!(
        source = %ingested.source,
        ready = report.ready,
        swatches = palette.len(),
        score = score.overall_score,
        "Analyzed image"
    );

    Analysis {
        source: ingested.source.to_string(),
        metadata: ingested.metadata.clone(),
        rows: report.rows(&config.requirements),
        badge: report.badge(),
        text_color: palette.text_color(),
        report,
        palette,
        score,
    }
}

/// Ingest and analyze one source.
pub fn load(source: &Source, config: &ArtcheckConfig) -> Result<Snapshot, IngestError> {
    let ingested = ingest::ingest(source)?;
    let analysis = analyze(&ingested, config);
    Ok(Snapshot {
        analysis,
        image: ingested.image,
    })
}

/// Outcome for one entry of a batch.
#[derive(Debug)]
pub struct BatchItem {
    pub source: Source,
    pub outcome: Result<Analysis, IngestError>,
}

impl BatchItem {
    pub fn is_ready(&self) -> bool {
        self.outcome.as_ref().is_ok_and(|a| a.report.ready)
    }
}

/// Counts of batch outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub ready: usize,
    pub needs_review: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn of(items: &[BatchItem]) -> Self {
        let mut summary = Self::default();
        for item in items {
            match &item.outcome {
                Ok(a) if a.report.ready => summary.ready += 1,
                Ok(_) => summary.needs_review += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.ready + self.needs_review + self.failed
    }
}

/// Analyze many sources in parallel. Output order matches input order.
pub fn analyze_batch(sources: &[Source], config: &ArtcheckConfig) -> Vec<BatchItem> {
    sources
        .par_iter()
        .map(|source| {
            let outcome = load(source, config).map(|snapshot| snapshot.analysis);
            if let Err(e) = &outcome {
                tracing::warn!(source = %source, error = %e, "Failed to load image");
            }
            BatchItem {
                source: source.clone(),
                outcome,
            }
        })
        .collect()
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// Expand CLI arguments into sources.
///
/// Directories are walked recursively for image files (sorted by path);
/// everything else goes through [`Source::parse`].
pub fn collect_sources(args: &[String]) -> Vec<Source> {
    let mut sources = Vec::new();
    for arg in args {
        let path = Path::new(arg);
        if path.is_dir() {
            let mut found: Vec<_> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|p| has_supported_extension(p))
                .collect();
            found.sort();
            tracing::debug!(dir = arg, images = found.len(), "Walked directory");
            sources.extend(found.into_iter().map(Source::File));
        } else {
            sources.push(Source::parse(arg));
        }
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{banded_image, solid_image, write_image};
    use tempfile::TempDir;

    #[test]
    fn sample_analysis_is_ready() {
        let snapshot = load(&Source::Sample, &ArtcheckConfig::default()).unwrap();
        let analysis = snapshot.analysis;
        assert!(analysis.report.ready);
        assert_eq!(analysis.badge, Badge::Ready);
        assert_eq!(analysis.source, "sample");
        assert!((1..=5).contains(&analysis.palette.len()));
        assert!((72..=98).contains(&analysis.score.overall_score));
    }

    #[test]
    fn small_png_needs_optimization() {
        let tmp = TempDir::new().unwrap();
        let path = write_image(tmp.path(), "cover.png", &solid_image(40, 40, [250, 250, 250, 255]));
        let snapshot = load(&Source::File(path), &ArtcheckConfig::default()).unwrap();
        let analysis = snapshot.analysis;

        assert!(!analysis.report.resolution_ok);
        assert!(analysis.report.size_ok);
        assert!(analysis.report.format_ok);
        assert_eq!(analysis.badge, Badge::NeedsOptimization);
        assert_eq!(analysis.rows[0].status(), "Review");
        assert_eq!(analysis.palette.swatches()[0].hex(), "#ffffff");
        assert_eq!(analysis.score.mood_label, score::RADIANT_MOOD);
    }

    #[test]
    fn configured_requirements_are_used() {
        let tmp = TempDir::new().unwrap();
        let path = write_image(tmp.path(), "cover.png", &solid_image(40, 40, [0, 0, 0, 255]));
        let mut config = ArtcheckConfig::default();
        config.requirements.min_dimension = 32;

        let analysis = load(&Source::File(path), &config).unwrap().analysis;
        assert!(analysis.report.ready);
        assert_eq!(analysis.rows[0].label, "Resolution 32x32 minimum");
    }

    #[test]
    fn metadata_and_color_paths_share_one_decode() {
        let tmp = TempDir::new().unwrap();
        let img = banded_image(50, &[(40, [0, 0, 0, 255]), (10, [255, 255, 255, 255])]);
        let path = write_image(tmp.path(), "bands.png", &img);
        let snapshot = load(&Source::File(path), &ArtcheckConfig::default()).unwrap();
        assert_eq!((snapshot.image.width(), snapshot.image.height()), (50, 50));
        assert_eq!(snapshot.analysis.metadata.width, 50);
        assert_eq!(snapshot.analysis.palette.dominant().hex(), "#000000");
    }

    #[test]
    fn batch_preserves_order_and_isolates_failures() {
        let tmp = TempDir::new().unwrap();
        let a = write_image(tmp.path(), "a.png", &solid_image(10, 10, [0, 0, 0, 255]));
        let b = tmp.path().join("missing.png");
        let c = write_image(tmp.path(), "c.png", &solid_image(10, 10, [255, 0, 0, 255]));
        let sources = vec![Source::File(a), Source::File(b), Source::File(c)];

        let results = analyze_batch(&sources, &ArtcheckConfig::default());
        assert_eq!(results.len(), 3);
        assert!(results[0].outcome.is_ok());
        assert!(matches!(results[1].outcome, Err(IngestError::Io { .. })));
        assert_eq!(
            results[2].outcome.as_ref().unwrap().palette.dominant().hex(),
            "#ff0000"
        );
        for (item, source) in results.iter().zip(&sources) {
            assert_eq!(&item.source, source);
        }

        let summary = BatchSummary::of(&results);
        assert_eq!(
            summary,
            BatchSummary {
                ready: 0,
                needs_review: 2,
                failed: 1
            }
        );
        assert_eq!(summary.total(), 3);
        assert!(!results[0].is_ready());
    }

    #[test]
    fn collect_sources_walks_directories() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("singles");
        std::fs::create_dir_all(&nested).unwrap();
        write_image(tmp.path(), "b.png", &solid_image(4, 4, [0, 0, 0, 255]));
        write_image(&nested, "a.jpg", &solid_image(4, 4, [0, 0, 0, 255]));
        std::fs::write(tmp.path().join("notes.txt"), "liner notes").unwrap();

        let dir = tmp.path().to_string_lossy().to_string();
        let sources = collect_sources(&[dir, "sample".to_string()]);
        assert_eq!(
            sources,
            vec![
                Source::File(tmp.path().join("b.png")),
                Source::File(nested.join("a.jpg")),
                Source::Sample,
            ]
        );
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(has_supported_extension(Path::new("COVER.JPG")));
        assert!(has_supported_extension(Path::new("art.WebP")));
        assert!(!has_supported_extension(Path::new("art.svg")));
        assert!(!has_supported_extension(Path::new("README")));
    }
}
