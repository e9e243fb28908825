//! Preview view state.
//!
//! Every control of the preview page is an explicit enum, and every user
//! action is a [`ViewEvent`]. [`ViewState::apply`] is the only transition:
//! it consumes the old state and returns the new one.
//!
//! Selection rules:
//! - In [`Layout::Grid`] every card is shown and the selection is uncapped.
//! - In [`Layout::Compare`] only selected cards are shown, and selecting a
//!   platform while [`COMPARE_LIMIT`] are already selected is rejected. The
//!   selection stays as it was; nothing is evicted.

use crate::platforms::{self, PLATFORMS, Platform, Polarity, PreviewState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Maximum simultaneous selections in compare layout.
pub const COMPARE_LIMIT: usize = 4;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Grid,
    Compare,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Grid => "grid",
            Layout::Compare => "compare",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Mobile,
    Tablet,
    Desktop,
}

impl Device {
    pub fn as_str(self) -> &'static str {
        match self {
            Device::Mobile => "mobile",
            Device::Tablet => "tablet",
            Device::Desktop => "desktop",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Device::Mobile => "MOBILE",
            Device::Tablet => "TABLET",
            Device::Desktop => "DESKTOP",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
    /// Each card uses its platform's own default polarity.
    Mixed,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
            ThemeMode::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    SetLayout(Layout),
    SetDevice(Device),
    SetState(PreviewState),
    SetTheme(ThemeMode),
    Select(String),
    Deselect(String),
    /// Flip one card between light and dark, independent of the global theme.
    ToggleCardTheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub layout: Layout,
    pub device: Device,
    pub state: PreviewState,
    pub theme: ThemeMode,
    /// Catalog indices, so iteration follows catalog order.
    selected: BTreeSet<usize>,
    card_overrides: BTreeMap<usize, Polarity>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            device: Device::default(),
            state: PreviewState::default(),
            theme: ThemeMode::default(),
            selected: (0..COMPARE_LIMIT).collect(),
            card_overrides: BTreeMap::new(),
        }
    }
}

fn catalog_index(name: &str) -> Option<usize> {
    let platform = platforms::find(name)?;
    PLATFORMS.iter().position(|p| p.name == platform.name)
}

impl ViewState {
    /// Apply one event and return the resulting state.
    pub fn apply(mut self, event: ViewEvent) -> Self {
        match event {
            ViewEvent::SetLayout(layout) => self.layout = layout,
            ViewEvent::SetDevice(device) => self.device = device,
            ViewEvent::SetState(state) => self.state = state,
            ViewEvent::SetTheme(theme) => {
                self.theme = theme;
                self.card_overrides.clear();
            }
            ViewEvent::Select(name) => {
                let Some(index) = catalog_index(&name) else {
                    tracing::debug!(%name, "Ignoring selection of unknown platform");
                    return self;
                };
                let at_limit = self.layout == Layout::Compare
                    && self.selected.len() >= COMPARE_LIMIT
                    && !self.selected.contains(&index);
                if at_limit {
                    tracing::debug!(%name, "Selection rejected: compare limit reached");
                    return self;
                }
                self.selected.insert(index);
            }
            ViewEvent::Deselect(name) => {
                if let Some(index) = catalog_index(&name) {
                    self.selected.remove(&index);
                }
            }
            ViewEvent::ToggleCardTheme(name) => {
                if let Some(index) = catalog_index(&name) {
                    let current = self.card_polarity(&PLATFORMS[index]);
                    self.card_overrides.insert(index, current.flipped());
                }
            }
        }
        self
    }

    /// Apply events in order.
    pub fn apply_all(self, events: impl IntoIterator<Item = ViewEvent>) -> Self {
        events.into_iter().fold(self, ViewState::apply)
    }

    /// Selected platforms in catalog order.
    pub fn selected(&self) -> Vec<&'static Platform> {
        self.selected.iter().map(|&i| &PLATFORMS[i]).collect()
    }

    pub fn is_selected(&self, platform: &Platform) -> bool {
        catalog_index(platform.name).is_some_and(|i| self.selected.contains(&i))
    }

    /// Cards shown under the current layout, in catalog order.
    pub fn visible_platforms(&self) -> Vec<&'static Platform> {
        match self.layout {
            Layout::Grid => PLATFORMS.iter().collect(),
            Layout::Compare => self.selected(),
        }
    }

    /// Polarity a card renders with.
    pub fn card_polarity(&self, platform: &Platform) -> Polarity {
        let overridden = catalog_index(platform.name).and_then(|i| self.card_overrides.get(&i));
        if let Some(&polarity) = overridden {
            return polarity;
        }
        match self.theme {
            ThemeMode::Dark => Polarity::Dark,
            ThemeMode::Light => Polarity::Light,
            ThemeMode::Mixed => platform.default_polarity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(platforms: &[&Platform]) -> Vec<&'static str> {
        platforms.iter().map(|p| p.name).collect()
    }

    fn select(name: &str) -> ViewEvent {
        ViewEvent::Select(name.to_string())
    }

    #[test]
    fn initial_state() {
        let view = ViewState::default();
        assert_eq!(view.layout, Layout::Grid);
        assert_eq!(view.device, Device::Mobile);
        assert_eq!(view.state, PreviewState::Expanded);
        assert_eq!(view.theme, ThemeMode::Dark);
        assert_eq!(
            names(&view.selected()),
            vec!["Spotify", "Apple Music", "Amazon Music", "Tencent Music"]
        );
    }

    #[test]
    fn fifth_selection_rejected_in_compare_layout() {
        let view = ViewState::default().apply(ViewEvent::SetLayout(Layout::Compare));
        let before = view.selected();
        let after = view.clone().apply(select("Deezer"));
        assert_eq!(after.selected(), before);
        assert_eq!(after, view);
    }

    #[test]
    fn reselecting_existing_platform_at_limit_is_noop() {
        let view = ViewState::default().apply(ViewEvent::SetLayout(Layout::Compare));
        let after = view.clone().apply(select("Spotify"));
        assert_eq!(after, view);
    }

    #[test]
    fn selection_uncapped_in_grid_layout() {
        let view = ViewState::default().apply_all([select("Deezer"), select("Melon")]);
        assert_eq!(view.selected().len(), 6);
    }

    #[test]
    fn deselect_frees_a_compare_slot() {
        let view = ViewState::default().apply_all([
            ViewEvent::SetLayout(Layout::Compare),
            ViewEvent::Deselect("Apple Music".to_string()),
            select("Deezer"),
        ]);
        assert_eq!(
            names(&view.visible_platforms()),
            vec!["Spotify", "Amazon Music", "Tencent Music", "Deezer"]
        );
    }

    #[test]
    fn unknown_platform_ignored() {
        let view = ViewState::default();
        assert_eq!(view.clone().apply(select("Napster")), view);
    }

    #[test]
    fn grid_shows_every_card() {
        let view = ViewState::default();
        assert_eq!(view.visible_platforms().len(), 11);
    }

    #[test]
    fn compare_shows_selection_in_catalog_order() {
        let view = ViewState::default().apply_all([
            ViewEvent::Deselect("Spotify".to_string()),
            ViewEvent::Deselect("Apple Music".to_string()),
            select("Deezer"),
            select("KKBOX"),
            ViewEvent::SetLayout(Layout::Compare),
        ]);
        assert_eq!(
            names(&view.visible_platforms()),
            vec!["Amazon Music", "Tencent Music", "KKBOX", "Deezer"]
        );
    }

    #[test]
    fn global_theme_applies_to_every_card() {
        let view = ViewState::default().apply(ViewEvent::SetTheme(ThemeMode::Light));
        assert!(
            PLATFORMS
                .iter()
                .all(|p| view.card_polarity(p) == Polarity::Light)
        );
    }

    #[test]
    fn mixed_theme_uses_catalog_defaults() {
        let view = ViewState::default().apply(ViewEvent::SetTheme(ThemeMode::Mixed));
        for p in PLATFORMS.iter() {
            assert_eq!(view.card_polarity(p), p.default_polarity, "{}", p.name);
        }
    }

    #[test]
    fn card_toggle_flips_one_card() {
        let view = ViewState::default().apply(ViewEvent::ToggleCardTheme("Melon".to_string()));
        let melon = platforms::find("Melon").unwrap();
        let spotify = platforms::find("Spotify").unwrap();
        assert_eq!(view.card_polarity(melon), Polarity::Light);
        assert_eq!(view.card_polarity(spotify), Polarity::Dark);

        let view = view.apply(ViewEvent::ToggleCardTheme("Melon".to_string()));
        assert_eq!(view.card_polarity(melon), Polarity::Dark);
    }

    #[test]
    fn global_theme_clears_card_toggles() {
        let melon = platforms::find("Melon").unwrap();
        let view = ViewState::default().apply_all([
            ViewEvent::ToggleCardTheme("Melon".to_string()),
            ViewEvent::SetTheme(ThemeMode::Dark),
        ]);
        assert_eq!(view.card_polarity(melon), Polarity::Dark);
    }

    #[test]
    fn device_and_state_changes_keep_selection() {
        let view = ViewState::default().apply_all([
            ViewEvent::SetDevice(Device::Desktop),
            ViewEvent::SetState(PreviewState::Lock),
        ]);
        assert_eq!(view.device.label(), "DESKTOP");
        assert_eq!(view.state.label(), "Lock Screen");
        assert_eq!(view.selected().len(), COMPARE_LIMIT);
    }
}
