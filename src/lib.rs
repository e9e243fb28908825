//! # Artcheck
//!
//! Album-artwork validation and platform preview. Give it a cover image (a
//! local file, a directory of files, a URL, or the built-in sample) and it
//! reports whether the artwork meets distribution requirements, extracts a
//! representative color palette, derives a few heuristic scores, and renders
//! a static page showing the artwork across eleven streaming platforms.
//!
//! # Architecture: One Decode, Two Paths
//!
//! ```text
//!                     ┌─▶ validate ─────────────▶ ValidationReport
//! Source ─▶ ingest ───┤
//!                     └─▶ palette ─▶ score ─────▶ Palette + ScoreResult
//!                                                      │
//!                           Analysis ◀─────────────────┘
//!                              │
//!                 ┌────────────┴────────────┐
//!              output                    preview
//!          (CLI text/JSON)        (HTML under a ViewState)
//! ```
//!
//! The metadata path and the color path read the same decoded image and never
//! influence each other. Each ingest produces a fresh chain; nothing
//! accumulates across images.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ingest`] | Acquires a file, URL or the sample and decodes it into an image plus metadata |
//! | [`sample`] | Procedurally rendered built-in sample artwork |
//! | [`validate`] | Resolution, file-size and format rules; readiness badge |
//! | [`palette`] | Dominant-color extraction by resample, quantize, count, rank |
//! | [`score`] | Overall score, contrast display and mood label from a palette |
//! | [`analysis`] | Runs both paths for one source, or a batch in parallel |
//! | [`session`] | Current-image slot guarded by request tokens |
//! | [`platforms`] | Streaming platform catalog and preview states |
//! | [`view`] | Preview view state and its pure transition function |
//! | [`preview`] | Renders the static HTML preview with Maud |
//! | [`config`] | `artcheck.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fixed-Cost Palette Extraction
//!
//! The palette is computed from a 50×50 resample, never from the full image.
//! A 6000×6000 cover costs the same to analyze as a thumbnail, and the result
//! is deterministic: same pixels in, same swatches out.
//!
//! ## Deterministic Contrast by Default
//!
//! The contrast figure is the WCAG ratio between the darkest and lightest
//! swatch. A randomized placeholder mode exists behind `[scoring] contrast`
//! for parity with older reports, with the RNG injectable for tests.
//!
//! ## Stale Loads Lose
//!
//! Every load through a [`session::Session`] is stamped with a token. A slow
//! load that completes after a newer one was started is discarded instead of
//! overwriting the newer result.

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod output;
pub mod palette;
pub mod platforms;
pub mod preview;
pub mod sample;
pub mod score;
pub mod session;
pub mod validate;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
