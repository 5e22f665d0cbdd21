use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::platform;
use super::source::SectionKey;

/// Item cap used when neither `<section>_max_items` nor `max_items` is set.
pub const DEFAULT_MAX_ITEMS: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Please define at least one media entity")]
    NoDataSource,

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Whole configuration file: host settings plus the card itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    pub card: CardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8990
}

fn default_opacity() -> f32 {
    0.7
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn default_path() -> PathBuf {
        platform::config_path()
    }
}

/// One configured entity reference, e.g. `tmdb_upcoming_entity = "sensor.tmdb_upcoming"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    /// The configuration key (`tmdb_upcoming_entity`). Doubles as the feed name.
    pub config_key: String,
    pub section: SectionKey,
    /// Host entity id (`sensor.tmdb_upcoming`).
    pub entity_id: String,
}

/// Per-section overrides (`<section>_max_items`, `<section>_label`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionOptions {
    pub max_items: Option<usize>,
    pub label: Option<String>,
    pub release_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlexServer {
    /// Base URL without a trailing slash.
    pub url: String,
    pub token: String,
}

/// The card configuration as written by the user: a flat table of known
/// keys plus `<prefix>_*` keys collected in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCardConfig {
    #[serde(default)]
    pub media_player_entity: Option<String>,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub blur_radius: u32,
    #[serde(default)]
    pub max_items: Option<usize>,
    #[serde(default)]
    pub plex_url: Option<String>,
    #[serde(default)]
    pub plex_token: Option<String>,
    #[serde(default)]
    pub jellyfin_url: Option<String>,
    #[serde(default)]
    pub auto_rotate_secs: Option<u64>,
    #[serde(flatten)]
    pub rest: toml::Table,
}

/// Validated, immutable card configuration.
///
/// Built once through [`CardConfig::try_from`]; nothing mutates it afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawCardConfig")]
pub struct CardConfig {
    entities: Vec<EntityRef>,
    section_options: HashMap<SectionKey, SectionOptions>,
    pub media_player_entity: Option<String>,
    pub opacity: f32,
    /// Background blur in pixels.
    pub blur_radius: u32,
    pub max_items: usize,
    pub plex: Option<PlexServer>,
    pub jellyfin_url: Option<String>,
    pub auto_rotate_secs: Option<u64>,
}

impl CardConfig {
    /// Parse a bare card table (the contents of `[card]`).
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawCardConfig = toml::from_str(content)?;
        Self::try_from(raw)
    }

    /// Entity references in declaration order.
    pub fn entities(&self) -> &[EntityRef] {
        &self.entities
    }

    /// Configured sections in declaration order; the first entity key of a
    /// section decides its position.
    pub fn section_order(&self) -> Vec<SectionKey> {
        let mut order = Vec::new();
        for entity in &self.entities {
            if !order.contains(&entity.section) {
                order.push(entity.section);
            }
        }
        order
    }

    pub fn has_section(&self, section: SectionKey) -> bool {
        self.entities.iter().any(|e| e.section == section)
    }

    /// Feeds of one section in declaration order.
    pub fn feeds_for(&self, section: SectionKey) -> impl Iterator<Item = &EntityRef> {
        self.entities.iter().filter(move |e| e.section == section)
    }

    pub fn max_items_for(&self, section: SectionKey) -> usize {
        self.section_options
            .get(&section)
            .and_then(|o| o.max_items)
            .unwrap_or(self.max_items)
    }

    pub fn label_for(&self, section: SectionKey) -> Option<&str> {
        self.section_options
            .get(&section)
            .and_then(|o| o.label.as_deref())
    }

    pub fn release_types_for(&self, section: SectionKey) -> Option<&[String]> {
        self.section_options
            .get(&section)
            .and_then(|o| o.release_types.as_deref())
    }
}

impl TryFrom<RawCardConfig> for CardConfig {
    type Error = ConfigError;

    fn try_from(raw: RawCardConfig) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&raw.opacity) {
            return Err(invalid("opacity", "must be between 0 and 1"));
        }
        if raw.max_items == Some(0) {
            return Err(invalid("max_items", "must be at least 1"));
        }

        let mut entities = Vec::new();
        let mut section_options: HashMap<SectionKey, SectionOptions> = HashMap::new();

        for (key, value) in &raw.rest {
            if key.ends_with("_entity") {
                let Some(section) = SectionKey::for_entity_key(key) else {
                    warn!("config: ignoring unknown entity key '{}'", key);
                    continue;
                };
                let entity_id = value
                    .as_str()
                    .ok_or_else(|| invalid(key, "expected an entity id string"))?
                    .trim();
                if entity_id.is_empty() {
                    continue;
                }
                entities.push(EntityRef {
                    config_key: key.clone(),
                    section,
                    entity_id: entity_id.to_string(),
                });
                continue;
            }

            if let Some((section, option)) = split_section_option(key) {
                let options = section_options.entry(section).or_default();
                match option {
                    SectionOption::MaxItems => {
                        let n = value
                            .as_integer()
                            .filter(|n| *n > 0)
                            .ok_or_else(|| invalid(key, "expected a positive integer"))?;
                        options.max_items = Some(n as usize);
                    }
                    SectionOption::Label => {
                        let label = value
                            .as_str()
                            .ok_or_else(|| invalid(key, "expected a string"))?;
                        options.label = Some(label.to_string());
                    }
                    SectionOption::ReleaseTypes => {
                        let types = value
                            .as_array()
                            .and_then(|a| {
                                a.iter()
                                    .map(|v| v.as_str().map(str::to_string))
                                    .collect::<Option<Vec<_>>>()
                            })
                            .ok_or_else(|| invalid(key, "expected a list of strings"))?;
                        options.release_types = Some(types);
                    }
                }
                continue;
            }

            debug!("config: ignoring key '{}'", key);
        }

        if entities.is_empty() {
            return Err(ConfigError::NoDataSource);
        }

        let plex = match (non_empty(raw.plex_url), non_empty(raw.plex_token)) {
            (Some(url), Some(token)) => Some(PlexServer {
                url: url.trim_end_matches('/').to_string(),
                token,
            }),
            (None, None) => None,
            _ => {
                warn!("config: plex_url and plex_token must both be set for remote play");
                None
            }
        };

        Ok(Self {
            entities,
            section_options,
            media_player_entity: non_empty(raw.media_player_entity),
            opacity: raw.opacity,
            blur_radius: raw.blur_radius,
            max_items: raw.max_items.unwrap_or(DEFAULT_MAX_ITEMS),
            plex,
            jellyfin_url: non_empty(raw.jellyfin_url).map(|u| u.trim_end_matches('/').to_string()),
            auto_rotate_secs: raw.auto_rotate_secs.filter(|s| *s > 0),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum SectionOption {
    MaxItems,
    Label,
    ReleaseTypes,
}

fn split_section_option(key: &str) -> Option<(SectionKey, SectionOption)> {
    [
        ("max_items", SectionOption::MaxItems),
        ("label", SectionOption::Label),
        ("release_types", SectionOption::ReleaseTypes),
    ]
    .into_iter()
    .find_map(|(suffix, option)| {
        let prefix = key.strip_suffix(suffix)?.strip_suffix('_')?;
        Some((prefix.parse().ok()?, option))
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_source_is_rejected() {
        let err = CardConfig::from_toml_str("opacity = 0.5\nmedia_player_entity = \"media_player.tv\"")
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoDataSource));
        assert_eq!(err.to_string(), "Please define at least one media entity");

        let err = CardConfig::from_toml_str("plex_entity = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::NoDataSource));

        let err = CardConfig::from_toml_str("emby_entity = \"sensor.emby\"").unwrap_err();
        assert!(matches!(err, ConfigError::NoDataSource));
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let config = CardConfig::from_toml_str(
            r#"
            sonarr_entity = "sensor.sonarr_mediarr"
            tmdb_upcoming_entity = "sensor.tmdb_upcoming"
            plex_entity = "sensor.plex_mediarr"
            tmdb_entity = "sensor.tmdb_mediarr"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.section_order(),
            vec![SectionKey::Sonarr, SectionKey::Tmdb, SectionKey::Plex]
        );
        let tmdb_feeds: Vec<&str> = config
            .feeds_for(SectionKey::Tmdb)
            .map(|e| e.config_key.as_str())
            .collect();
        assert_eq!(tmdb_feeds, vec!["tmdb_upcoming_entity", "tmdb_entity"]);
        assert!(!config.has_section(SectionKey::Radarr));
    }

    #[test]
    fn test_section_options_and_defaults() {
        let config = CardConfig::from_toml_str(
            r#"
            radarr2_entity = "sensor.radarr"
            radarr2_max_items = 3
            radarr2_release_types = ["Digital"]
            radarr2_label = "Coming Soon"
            plex_entity = "sensor.plex"
            plex_url = "http://plex.local:32400/"
            plex_token = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.max_items_for(SectionKey::Radarr2), 3);
        assert_eq!(config.max_items_for(SectionKey::Plex), DEFAULT_MAX_ITEMS);
        assert_eq!(
            config.release_types_for(SectionKey::Radarr2),
            Some(&["Digital".to_string()][..])
        );
        assert_eq!(config.label_for(SectionKey::Radarr2), Some("Coming Soon"));
        assert_eq!(config.opacity, 0.7);
        assert_eq!(config.blur_radius, 0);
        let plex = config.plex.unwrap();
        assert_eq!(plex.url, "http://plex.local:32400");
        assert_eq!(plex.token, "abc");
    }

    #[test]
    fn test_invalid_values() {
        let err = CardConfig::from_toml_str("plex_entity = \"sensor.plex\"\nopacity = 1.5")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "opacity"));

        let err = CardConfig::from_toml_str("plex_entity = \"sensor.plex\"\nplex_max_items = 0")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "plex_max_items"));

        let err = CardConfig::from_toml_str("plex_entity = 5").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [http]
            port = 9000

            [card]
            jellyfin_entity = "sensor.jellyfin_mediarr"
            media_player_entity = "media_player.tv"
            blur_radius = 4
            "#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.bind_address, "127.0.0.1");
        assert_eq!(config.card.section_order(), vec![SectionKey::Jellyfin]);
        assert_eq!(config.card.media_player_entity.as_deref(), Some("media_player.tv"));
        assert_eq!(config.card.blur_radius, 4);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/mediarr.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/mediarr.toml"));
    }

    #[test]
    fn test_card_without_entities_fails_whole_file() {
        let err = Config::from_toml_str("[card]\nopacity = 0.4").unwrap_err();
        assert!(err.to_string().contains("at least one media entity"));
    }
}
