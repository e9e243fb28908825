//! Checker configuration.
//!
//! Handles loading, validating, and merging `artcheck.toml`. Stock defaults
//! are overridden by a user file in the config directory (the working
//! directory unless `--config` says otherwise).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [requirements]
//! min_dimension = 3000            # Minimum width and height in pixels
//! max_file_size_bytes = 10485760  # 10 MB; a size of 0 (unknown) always passes
//! allowed_formats = ["image/jpeg", "image/png", "image/webp"]
//!
//! [palette]
//! sample_size = 50                # Images are resampled to N×N before counting
//! quantization_step = 32          # Channel rounding step
//! max_swatches = 5                # 1-5
//!
//! [scoring]
//! contrast = "wcag"               # "wcag" or "placeholder"
//!
//! [processing]
//! max_processes = 4               # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::palette::MAX_SWATCHES;
use crate::score::ContrastMode;
use crate::validate::Requirements;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up inside the config directory.
pub const CONFIG_FILE_NAME: &str = "artcheck.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `artcheck.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtcheckConfig {
    /// Distribution requirements every artwork is validated against.
    pub requirements: Requirements,
    /// Palette sampling settings.
    pub palette: PaletteConfig,
    /// Score derivation settings.
    pub scoring: ScoringConfig,
    /// Parallel batch settings.
    pub processing: ProcessingConfig,
}

impl ArtcheckConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requirements.min_dimension == 0 {
            return Err(ConfigError::Validation(
                "requirements.min_dimension must be non-zero".into(),
            ));
        }
        if self.requirements.allowed_formats.is_empty() {
            return Err(ConfigError::Validation(
                "requirements.allowed_formats must not be empty".into(),
            ));
        }
        if self.palette.sample_size == 0 {
            return Err(ConfigError::Validation(
                "palette.sample_size must be non-zero".into(),
            ));
        }
        if !(1..=128).contains(&self.palette.quantization_step) {
            return Err(ConfigError::Validation(
                "palette.quantization_step must be 1-128".into(),
            ));
        }
        if !(1..=MAX_SWATCHES).contains(&self.palette.max_swatches) {
            return Err(ConfigError::Validation(format!(
                "palette.max_swatches must be 1-{MAX_SWATCHES}"
            )));
        }
        Ok(())
    }
}

/// Palette sampling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaletteConfig {
    /// Edge length of the square grid the image is resampled into.
    pub sample_size: u32,
    /// Channels are rounded to the nearest multiple of this step.
    pub quantization_step: u32,
    /// Number of swatches to keep.
    pub max_swatches: usize,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            sample_size: 50,
            quantization_step: 32,
            max_swatches: MAX_SWATCHES,
        }
    }
}

/// Score derivation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// How the contrast figure is produced.
    pub contrast: ContrastMode,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel analysis workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ArtcheckConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `artcheck.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ArtcheckConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ArtcheckConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `artcheck.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<ArtcheckConfig, ConfigError> {
    let overlay = load_raw_config(dir)?;
    if overlay.is_some() {
        tracing::debug!(dir = %dir.display(), "Loaded {CONFIG_FILE_NAME}");
    }
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `artcheck.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# artcheck configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Distribution requirements
# ---------------------------------------------------------------------------
[requirements]
# Minimum width AND height in pixels.
min_dimension = 3000

# Maximum file size in bytes (10 MB). Sources without a known size
# (URLs, the built-in sample) always pass.
max_file_size_bytes = 10485760

# MIME types accepted by distributors. The built-in vector sample
# (image/svg+xml) is always accepted.
allowed_formats = ["image/jpeg", "image/png", "image/webp"]

# ---------------------------------------------------------------------------
# Palette extraction
# ---------------------------------------------------------------------------
[palette]
# Images are resampled to sample_size x sample_size before counting colors.
sample_size = 50

# Each channel is rounded to the nearest multiple of this step (1-128).
quantization_step = 32

# Number of swatches to report (1-5).
max_swatches = 5

# ---------------------------------------------------------------------------
# Scoring
# ---------------------------------------------------------------------------
[scoring]
# "wcag": contrast ratio between the darkest and lightest swatch.
# "placeholder": random 4.0-6.0 mock value.
contrast = "wcag"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for batch checks.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
