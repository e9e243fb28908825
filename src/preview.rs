//! Static HTML preview page.
//!
//! Renders one analysis under one [`ViewState`] into a self-contained page:
//!
//! ```text
//! out/
//! ├── index.html     # report, palette, scores, platform cards
//! └── artwork.png    # the artwork every card displays
//! ```
//!
//! The page has no scripts. A different layout, device or theme is a
//! different `ViewState` and a fresh render.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating;
//! every interpolated string is escaped.

use crate::analysis::{Analysis, Snapshot};
use crate::palette::{self, ColorSwatch};
use crate::platforms::Platform;
use crate::view::ViewState;
use image::ImageFormat;
use image::imageops::FilterType;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CSS: &str = include_str!("../static/preview.css");

pub const PAGE_FILE: &str = "index.html";
pub const ARTWORK_FILE: &str = "artwork.png";

/// Longest edge of the artwork copy written next to the page.
const ARTWORK_MAX_EDGE: u32 = 1200;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Write `index.html` and `artwork.png` into `out_dir`, creating it if needed.
/// Returns the path of the page.
pub fn write_preview(
    snapshot: &Snapshot,
    view: &ViewState,
    out_dir: &Path,
) -> Result<PathBuf, PreviewError> {
    fs::create_dir_all(out_dir)?;

    let image = &snapshot.image;
    let artwork = if image.width().max(image.height()) > ARTWORK_MAX_EDGE {
        image.resize(ARTWORK_MAX_EDGE, ARTWORK_MAX_EDGE, FilterType::Triangle)
    } else {
        image.clone()
    };
    artwork.save_with_format(out_dir.join(ARTWORK_FILE), ImageFormat::Png)?;

    let page = render_preview(&snapshot.analysis, view, ARTWORK_FILE);
    let page_path = out_dir.join(PAGE_FILE);
    fs::write(&page_path, page.into_string())?;

    tracing::info!(
        page = %page_path.display(),
        cards = view.visible_platforms().len(),
        "Wrote preview"
    );
    Ok(page_path)
}

/// Render the full preview page.
pub fn render_preview(analysis: &Analysis, view: &ViewState, image_href: &str) -> Markup {
    let body_class = format!(
        "layout-{} device-{} state-{}",
        view.layout.as_str(),
        view.device.as_str(),
        view.state.as_str()
    );
    let content = html! {
        header.page-header {
            h1 { "Artwork preview" }
            p.source { (analysis.source) }
        }
        main {
            section.report {
                img.artwork src=(image_href) alt="Artwork";
                (render_metadata(analysis))
                (render_validation(analysis))
                (render_palette(analysis))
                (render_scores(analysis))
            }
            section.platforms {
                h2 { "Platforms" }
                div.cards {
                    @for platform in view.visible_platforms() {
                        (render_card(platform, view, image_href))
                    }
                }
            }
        }
    };
    base_document(
        "Artwork preview",
        &theme_css(analysis),
        Some(body_class.as_str()),
        content,
    )
}

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Stylesheet with the palette injected as custom properties.
fn theme_css(analysis: &Analysis) -> String {
    format!(
        ":root {{\n    --dominant: {};\n    --dominant-text: {};\n}}\n{}",
        analysis.palette.dominant(),
        analysis.text_color,
        CSS
    )
}

fn render_metadata(analysis: &Analysis) -> Markup {
    let meta = &analysis.metadata;
    html! {
        dl.metadata {
            dt { "Dimensions" } dd { (meta.dimensions_label()) }
            dt { "File size" } dd { (meta.size_label()) }
            dt { "Format" } dd { (meta.format_label()) }
        }
    }
}

fn render_validation(analysis: &Analysis) -> Markup {
    let badge = analysis.badge;
    let badge_class = if badge.is_warning() {
        "badge warning"
    } else {
        "badge"
    };
    html! {
        div class=(badge_class) { (badge.label()) }
        ul.validation {
            @for row in &analysis.rows {
                li class=[(!row.ok).then_some("review")] {
                    span { (row.label) }
                    strong { (row.status()) }
                }
            }
        }
    }
}

fn render_swatch(swatch: ColorSwatch) -> Markup {
    let text = palette::contrasting_text(swatch);
    html! {
        div.swatch style={ "background:" (swatch) ";color:" (text) } {
            (swatch.hex().to_uppercase())
        }
    }
}

fn render_palette(analysis: &Analysis) -> Markup {
    html! {
        div.palette {
            @for swatch in analysis.palette.iter() {
                (render_swatch(*swatch))
            }
        }
        p.text-color { "Text color " code { (analysis.text_color) } }
    }
}

fn render_scores(analysis: &Analysis) -> Markup {
    let score = &analysis.score;
    html! {
        dl.scores {
            dt { "Overall" } dd.overall { (score.overall_score) }
            dt { "Contrast" } dd.contrast { (score.contrast_display) }
            dt { "Mood" } dd.mood { (score.mood_label) }
        }
    }
}

fn render_card(platform: &Platform, view: &ViewState, image_href: &str) -> Markup {
    let polarity = view.card_polarity(platform);
    let mut class = format!("platform-card {}", polarity.as_str());
    if view.is_selected(platform) {
        class.push_str(" selected");
    }
    html! {
        article class=(class) data-platform=(platform.name) {
            div.platform-header {
                span.platform-chip style={ "background:" (platform.accent) } { (platform.name) }
            }
            div.platform-preview {
                img.preview-image src=(image_href) alt={ (platform.name) " preview" };
                div.preview-row {
                    span { (view.device.label()) }
                    span { (view.state.label()) }
                }
                div.preview-row {
                    span { "Light/Dark sync" }
                    span { (view.theme.as_str()) }
                }
            }
        }
    }
}
