//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! 001 cover.jpg
//!     Source: art/cover.jpg
//!     Dimensions: 3000 x 3000px
//!     File size: 2.31 MB
//!     Format: image/jpeg
//!     Resolution 3000x3000 minimum: Pass
//!     File size ≤ 10MB: Pass
//!     Format JPG/PNG/WebP: Pass
//!     Palette: #202020 #404060 #e0a040
//!     Text color: #f5f5f5
//!     Score: 85 · Contrast 7.4:1 · Moody · Cinematic · Midnight
//!     Ready for distribution
//! 002 missing.png
//!     Source: art/missing.png
//!     Error: IO error reading art/missing.png: No such file or directory
//!     URL load failed
//!
//! Checked 2 images: 1 ready, 0 need review, 1 failed
//! ```
//!
//! ## Preview
//!
//! ```text
//! Preview → out/index.html (11 cards, grid, MOBILE, Now Playing, dark)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::analysis::{Analysis, BatchItem, BatchSummary};
use crate::ingest::{IngestError, Source};
use crate::platforms::PLATFORMS;
use crate::validate::Badge;
use crate::view::ViewState;
use serde::Serialize;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Display title for a source: the file name for files, the source itself otherwise.
fn source_title(source: &Source) -> String {
    match source {
        Source::File(path) => path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        other => other.to_string(),
    }
}

fn entity_header(index: usize, source: &Source) -> Vec<String> {
    let mut lines = vec![format!("{} {}", format_index(index), source_title(source))];
    if let Source::File(path) = source {
        lines.push(format!("    Source: {}", path.display()));
    }
    lines
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

// ============================================================================
// Check output
// ============================================================================

/// Format one successful analysis.
pub fn format_analysis(index: usize, source: &Source, analysis: &Analysis) -> Vec<String> {
    let mut lines = entity_header(index, source);
    let meta = &analysis.metadata;
    lines.push(format!("    Dimensions: {}", meta.dimensions_label()));
    lines.push(format!("    File size: {}", meta.size_label()));
    lines.push(format!("    Format: {}", meta.format_label()));

    for row in &analysis.rows {
        lines.push(format!("    {}: {}", row.label, row.status()));
    }

    let swatches: Vec<String> = analysis.palette.iter().map(|s| s.hex()).collect();
    lines.push(format!("    Palette: {}", swatches.join(" ")));
    lines.push(format!("    Text color: {}", analysis.text_color));

    let score = &analysis.score;
    lines.push(format!(
        "    Score: {} · Contrast {} · {}",
        score.overall_score, score.contrast_display, score.mood_label
    ));
    lines.push(format!("    {}", analysis.badge.label()));
    lines
}

/// Format a source that could not be loaded.
pub fn format_failure(index: usize, source: &Source, error: &IngestError) -> Vec<String> {
    let mut lines = entity_header(index, source);
    lines.push(format!("    Error: {}", error));
    lines.push(format!("    {}", Badge::LoadFailed.label()));
    lines
}

pub fn format_summary(summary: &BatchSummary) -> String {
    format!(
        "Checked {}: {} ready, {} need review, {} failed",
        plural(summary.total(), "image", "images"),
        summary.ready,
        summary.needs_review,
        summary.failed
    )
}

/// Format every batch entry in input order, followed by the summary line.
pub fn format_batch(items: &[BatchItem]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let entry = match &item.outcome {
            Ok(analysis) => format_analysis(i + 1, &item.source, analysis),
            Err(e) => format_failure(i + 1, &item.source, e),
        };
        lines.extend(entry);
    }
    if items.len() > 1 {
        lines.push(String::new());
        lines.push(format_summary(&BatchSummary::of(items)));
    }
    lines
}

/// Print check output to stdout.
pub fn print_batch(items: &[BatchItem]) {
    for line in format_batch(items) {
        println!("{}", line);
    }
}

// ============================================================================
// JSON output
// ============================================================================

#[derive(Serialize)]
#[serde(untagged)]
enum JsonEntry<'a> {
    Analyzed(&'a Analysis),
    Failed { source: String, error: String },
}

/// Batch results as a pretty-printed JSON array.
pub fn format_json(items: &[BatchItem]) -> Result<String, serde_json::Error> {
    let entries: Vec<JsonEntry> = items
        .iter()
        .map(|item| match &item.outcome {
            Ok(analysis) => JsonEntry::Analyzed(analysis),
            Err(e) => JsonEntry::Failed {
                source: item.source.to_string(),
                error: e.to_string(),
            },
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

// ============================================================================
// Platforms and preview output
// ============================================================================

/// Format the platform catalog.
///
/// ```text
/// 001 Spotify          #1DB954  dark
/// ```
pub fn format_platforms() -> Vec<String> {
    PLATFORMS
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "{} {:<16} {}  {}",
                format_index(i + 1),
                p.name,
                p.accent,
                p.default_polarity.as_str()
            )
        })
        .collect()
}

pub fn print_platforms() {
    for line in format_platforms() {
        println!("{}", line);
    }
}

pub fn format_preview_output(page: &Path, view: &ViewState) -> Vec<String> {
    vec![format!(
        "Preview \u{2192} {} ({}, {}, {}, {}, {})",
        page.display(),
        plural(view.visible_platforms().len(), "card", "cards"),
        view.layout.as_str(),
        view.device.label(),
        view.state.label(),
        view.theme.as_str()
    )]
}

pub fn print_preview_output(page: &Path, view: &ViewState) {
    for line in format_preview_output(page, view) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis;
    use crate::config::ArtcheckConfig;
    use crate::test_helpers::{solid_image, write_image};
    use crate::view::{Layout, ViewEvent};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample_analysis() -> Analysis {
        analysis::load(&Source::Sample, &ArtcheckConfig::default())
            .unwrap()
            .analysis
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn source_title_uses_file_name() {
        assert_eq!(
            source_title(&Source::File(PathBuf::from("art/cover.jpg"))),
            "cover.jpg"
        );
        assert_eq!(source_title(&Source::Sample), "sample");
        assert_eq!(
            source_title(&Source::Url("https://x.test/a.png".to_string())),
            "https://x.test/a.png"
        );
    }

    #[test]
    fn sample_analysis_lines() {
        let analysis = sample_analysis();
        let lines = format_analysis(1, &Source::Sample, &analysis);

        assert_eq!(lines[0], "001 sample");
        assert_eq!(lines[1], "    Dimensions: 1200 x 1200px");
        assert_eq!(lines[2], "    File size: —");
        assert_eq!(lines[3], "    Format: image/svg+xml");
        assert_eq!(lines[4], "    Resolution 3000x3000 minimum: Pass");
        assert_eq!(lines[5], "    File size ≤ 10MB: Pass");
        assert_eq!(lines[6], "    Format JPG/PNG/WebP: Pass");
        assert!(lines[7].starts_with("    Palette: #"));
        assert!(lines[9].starts_with("    Score: "));
        assert!(lines[9].contains(":1 · "));
        assert_eq!(lines.last().unwrap(), "    Ready for distribution");
    }

    #[test]
    fn file_analysis_has_source_line() {
        let analysis = sample_analysis();
        let source = Source::File(PathBuf::from("art/cover.png"));
        let lines = format_analysis(3, &source, &analysis);
        assert_eq!(lines[0], "003 cover.png");
        assert_eq!(lines[1], "    Source: art/cover.png");
    }

    #[test]
    fn batch_lists_failures_and_summary() {
        let tmp = TempDir::new().unwrap();
        let ok = write_image(tmp.path(), "small.png", &solid_image(10, 10, [0, 0, 0, 255]));
        let missing = tmp.path().join("missing.png");
        let items = analysis::analyze_batch(
            &[Source::File(ok), Source::File(missing), Source::Sample],
            &ArtcheckConfig::default(),
        );

        let lines = format_batch(&items);
        assert_eq!(lines[0], "001 small.png");
        assert!(lines.contains(&"    Needs optimization".to_string()));
        assert!(lines.contains(&"002 missing.png".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("    Error: IO error reading")));
        assert!(lines.contains(&"    URL load failed".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Checked 3 images: 1 ready, 1 need review, 1 failed"
        );
    }

    #[test]
    fn single_item_batch_has_no_summary() {
        let items = analysis::analyze_batch(&[Source::Sample], &ArtcheckConfig::default());
        let lines = format_batch(&items);
        assert!(!lines.iter().any(|l| l.starts_with("Checked")));
    }

    #[test]
    fn summary_pluralizes() {
        let summary = BatchSummary {
            ready: 1,
            needs_review: 0,
            failed: 0,
        };
        assert_eq!(
            format_summary(&summary),
            "Checked 1 image: 1 ready, 0 need review, 0 failed"
        );
    }

    #[test]
    fn json_contains_analyses_and_failures() {
        let items = analysis::analyze_batch(
            &[
                Source::Sample,
                Source::File(PathBuf::from("/nonexistent/cover.png")),
            ],
            &ArtcheckConfig::default(),
        );
        let json = format_json(&items).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entries = value.as_array().unwrap();

        assert_eq!(entries[0]["source"], "sample");
        assert_eq!(entries[0]["report"]["ready"], true);
        assert_eq!(entries[0]["badge"], "ready");
        assert!(entries[0]["palette"][0].as_str().unwrap().starts_with('#'));
        assert_eq!(entries[1]["source"], "/nonexistent/cover.png");
        assert!(entries[1]["error"].as_str().unwrap().contains("IO error"));
    }

    #[test]
    fn platforms_listing() {
        let lines = format_platforms();
        assert_eq!(lines.len(), 11);
        assert!(lines[0].starts_with("001 Spotify"));
        assert!(lines[0].ends_with("#1DB954  dark"));
        assert!(lines[1].ends_with("#fa2d48  light"));
    }

    #[test]
    fn preview_output_line() {
        let view = ViewState::default().apply(ViewEvent::SetLayout(Layout::Compare));
        let lines = format_preview_output(Path::new("out/index.html"), &view);
        assert_eq!(
            lines,
            vec!["Preview \u{2192} out/index.html (4 cards, compare, MOBILE, Now Playing, dark)"]
        );
    }
}
