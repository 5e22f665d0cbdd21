//! CardState: every piece of mutable card state in one record.
//!
//! Owned by [`Card`](crate::card::Card) and lent out by `&mut` to section
//! operations. Nothing else holds on to it.

use indexmap::IndexMap;
use mediarr_proto::config::CardConfig;
use mediarr_proto::item::MediaItem;
use mediarr_proto::source::SectionKey;
use tracing::warn;

use crate::client_selector::ClientSelector;
use crate::now_playing::NowPlaying;
use crate::selection::Selection;
use crate::view::CardView;

/// Items per feed key, feeds in configuration order.
pub type FeedCache = IndexMap<String, Vec<MediaItem>>;

#[derive(Debug, Clone, Default)]
pub struct CardState {
    pub selection: Selection,
    pub feeds: IndexMap<SectionKey, FeedCache>,
    pub view: CardView,
    pub now_playing: NowPlaying,
    pub selector: ClientSelector,
}

impl CardState {
    /// Empty caches for every configured feed, so merges follow
    /// declaration order regardless of delivery order.
    pub fn new(config: &CardConfig) -> Self {
        let mut feeds: IndexMap<SectionKey, FeedCache> = IndexMap::new();
        for entity in config.entities() {
            feeds
                .entry(entity.section)
                .or_default()
                .insert(entity.config_key.clone(), Vec::new());
        }
        Self {
            feeds,
            ..Self::default()
        }
    }

    /// Replace one feed's items. Other feeds of the section are untouched.
    pub fn store_feed(&mut self, section: SectionKey, feed: &str, items: Vec<MediaItem>) {
        let Some(cache) = self.feeds.get_mut(&section) else {
            warn!("card: dropping feed {} for unconfigured section {}", feed, section);
            return;
        };
        match cache.get_mut(feed) {
            Some(slot) => *slot = items,
            None => {
                cache.insert(feed.to_string(), items);
            }
        }
    }

    /// The section's displayed list: real items of all feeds in order; the
    /// sentinel when no feed has real items but one reported empty; else `[]`.
    pub fn merged(&self, section: SectionKey) -> Vec<MediaItem> {
        let Some(cache) = self.feeds.get(&section) else {
            return Vec::new();
        };

        let real: Vec<MediaItem> = cache
            .values()
            .flatten()
            .filter(|item| !item.is_empty_sentinel())
            .cloned()
            .collect();
        if !real.is_empty() {
            return real;
        }

        cache
            .values()
            .flatten()
            .find(|item| item.is_empty_sentinel())
            .cloned()
            .into_iter()
            .collect()
    }

    /// Number of selectable (non-sentinel) items.
    pub fn real_len(&self, section: SectionKey) -> usize {
        self.feeds.get(&section).map_or(0, |cache| {
            cache
                .values()
                .flatten()
                .filter(|item| !item.is_empty_sentinel())
                .count()
        })
    }

    /// Items of one feed as last stored.
    pub fn feed(&self, section: SectionKey, feed: &str) -> Option<&[MediaItem]> {
        self.feeds.get(&section)?.get(feed).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> MediaItem {
        MediaItem {
            title: title.into(),
            ..MediaItem::default()
        }
    }

    fn tmdb_config() -> CardConfig {
        CardConfig::from_toml_str(
            r#"
            tmdb_entity = "sensor.tmdb"
            tmdb_upcoming_entity = "sensor.tmdb_upcoming"
            plex_entity = "sensor.plex"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_merge_follows_config_order() {
        let mut state = CardState::new(&tmdb_config());
        state.store_feed(SectionKey::Tmdb, "tmdb_upcoming_entity", vec![item("U1")]);
        state.store_feed(SectionKey::Tmdb, "tmdb_entity", vec![item("T1"), item("T2")]);

        let titles: Vec<String> = state.merged(SectionKey::Tmdb).into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["T1", "T2", "U1"]);
        assert_eq!(state.real_len(SectionKey::Tmdb), 3);
    }

    #[test]
    fn test_sentinel_never_mixed_with_real_items() {
        let mut state = CardState::new(&tmdb_config());
        assert!(state.merged(SectionKey::Tmdb).is_empty());

        state.store_feed(SectionKey::Tmdb, "tmdb_entity", vec![MediaItem::empty()]);
        assert_eq!(state.merged(SectionKey::Tmdb), vec![MediaItem::empty()]);
        assert_eq!(state.real_len(SectionKey::Tmdb), 0);

        state.store_feed(SectionKey::Tmdb, "tmdb_upcoming_entity", vec![item("U1")]);
        assert_eq!(state.merged(SectionKey::Tmdb), vec![item("U1")]);
    }

    #[test]
    fn test_unconfigured_section_is_ignored() {
        let mut state = CardState::new(&tmdb_config());
        state.store_feed(SectionKey::Sonarr, "sonarr_entity", vec![item("S")]);
        assert!(state.merged(SectionKey::Sonarr).is_empty());
        assert_eq!(state.feed(SectionKey::Sonarr, "sonarr_entity"), None);
    }
}
