//! Section identities and the entity-reference keys (feeds) that route to them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration key of the playback entity driving the now-playing overlay.
/// It ends in `_entity` like the feed keys but never routes to a section.
pub const MEDIA_PLAYER_ENTITY_KEY: &str = "media_player_entity";

/// One provider section of the card.  The lowercase string form is the DOM
/// identity (`data-section`, `data-type`) and the configuration prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Plex,
    Jellyfin,
    Sonarr,
    Radarr,
    Radarr2,
    Seer,
    Tmdb,
    Trakt,
}

impl SectionKey {
    pub const ALL: [SectionKey; 8] = [
        SectionKey::Plex,
        SectionKey::Jellyfin,
        SectionKey::Sonarr,
        SectionKey::Radarr,
        SectionKey::Radarr2,
        SectionKey::Seer,
        SectionKey::Tmdb,
        SectionKey::Trakt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Plex => "plex",
            SectionKey::Jellyfin => "jellyfin",
            SectionKey::Sonarr => "sonarr",
            SectionKey::Radarr => "radarr",
            SectionKey::Radarr2 => "radarr2",
            SectionKey::Seer => "seer",
            SectionKey::Tmdb => "tmdb",
            SectionKey::Trakt => "trakt",
        }
    }

    /// Known feed keys for this section, in their canonical order.
    pub fn feeds(self) -> &'static [&'static str] {
        match self {
            SectionKey::Plex => &["plex_entity"],
            SectionKey::Jellyfin => &["jellyfin_entity"],
            SectionKey::Sonarr => &["sonarr_entity"],
            SectionKey::Radarr => &["radarr_entity"],
            SectionKey::Radarr2 => &["radarr2_entity"],
            SectionKey::Seer => &[
                "seer_entity",
                "seer_trending_entity",
                "seer_discover_entity",
                "seer_popular_movies_entity",
                "seer_popular_tv_entity",
            ],
            SectionKey::Tmdb => &[
                "tmdb_entity",
                "tmdb_airing_today_entity",
                "tmdb_now_playing_entity",
                "tmdb_on_air_entity",
                "tmdb_upcoming_entity",
            ],
            SectionKey::Trakt => &["trakt_entity"],
        }
    }

    /// Sections fed by several named entities at once.
    pub fn is_multi_feed(self) -> bool {
        self.feeds().len() > 1
    }

    /// Map a configuration key such as `tmdb_upcoming_entity` to its section.
    ///
    /// Every `tmdb_*_entity` / `seer_*_entity` key routes to the multi-feed
    /// section; other sections accept exactly `<key>_entity`.
    pub fn for_entity_key(config_key: &str) -> Option<Self> {
        if config_key == MEDIA_PLAYER_ENTITY_KEY {
            return None;
        }
        let stem = config_key.strip_suffix("_entity")?;
        if stem == "tmdb" || stem.starts_with("tmdb_") {
            return Some(SectionKey::Tmdb);
        }
        if stem == "seer" || stem.starts_with("seer_") {
            return Some(SectionKey::Seer);
        }
        stem.parse().ok()
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for SectionKey {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}
