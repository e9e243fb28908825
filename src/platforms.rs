//! Streaming platform catalog and preview states.
//!
//! Static lookup data: each platform has an accent color and the theme its
//! player defaults to. Order is significant; it is the display order and the
//! order the initial selection is taken from.

use serde::{Deserialize, Serialize};

/// Light or dark rendering of a preview card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Dark,
    Light,
}

impl Polarity {
    pub fn flipped(self) -> Self {
        match self {
            Polarity::Dark => Polarity::Light,
            Polarity::Light => Polarity::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Dark => "dark",
            Polarity::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Platform {
    pub name: &'static str,
    pub accent: &'static str,
    pub default_polarity: Polarity,
}

const fn platform(name: &'static str, accent: &'static str, default_polarity: Polarity) -> Platform {
    Platform {
        name,
        accent,
        default_polarity,
    }
}

pub static PLATFORMS: [Platform; 11] = [
    platform("Spotify", "#1DB954", Polarity::Dark),
    platform("Apple Music", "#fa2d48", Polarity::Light),
    platform("Amazon Music", "#25d1e6", Polarity::Dark),
    platform("Tencent Music", "#ffb800", Polarity::Light),
    platform("YouTube Music", "#ff0000", Polarity::Dark),
    platform("KKBOX", "#2e4df0", Polarity::Dark),
    platform("Melon", "#00cd3c", Polarity::Light),
    platform("Boomplay", "#ff7a00", Polarity::Dark),
    platform("Audiomack", "#ffa200", Polarity::Dark),
    platform("Mdundo", "#6cc24a", Polarity::Light),
    platform("Deezer", "#ff4c8b", Polarity::Dark),
];

/// Case-insensitive lookup by display name.
pub fn find(name: &str) -> Option<&'static Platform> {
    PLATFORMS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Player UI context a card simulates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PreviewState {
    #[default]
    Expanded,
    Collapsed,
    Lock,
    Playlist,
    Search,
    Hero,
}

impl PreviewState {
    pub const ALL: [PreviewState; 6] = [
        PreviewState::Expanded,
        PreviewState::Collapsed,
        PreviewState::Lock,
        PreviewState::Playlist,
        PreviewState::Search,
        PreviewState::Hero,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PreviewState::Expanded => "expanded",
            PreviewState::Collapsed => "collapsed",
            PreviewState::Lock => "lock",
            PreviewState::Playlist => "playlist",
            PreviewState::Search => "search",
            PreviewState::Hero => "hero",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PreviewState::Expanded => "Now Playing",
            PreviewState::Collapsed => "Collapsed",
            PreviewState::Lock => "Lock Screen",
            PreviewState::Playlist => "Playlist",
            PreviewState::Search => "Search",
            PreviewState::Hero => "Album Hero",
        }
    }
}
