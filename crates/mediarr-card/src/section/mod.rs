//! Section trait: the interface every provider variant implements.
//!
//! Design principles:
//! - A section owns no state: caches, selection and view live in `CardState`,
//!   which the orchestrator passes in by `&mut`.
//! - Variants supply identity, normalization and the detail-panel body.
//!   Everything else has a default that delegates to [`base`]; a variant
//!   overriding a method can still call the `base` function it replaces.
//! - The set of variants is fixed; [`SectionRegistry::standard`] builds it.

pub mod base;

use std::borrow::Cow;

use indexmap::IndexMap;
use mediarr_proto::config::CardConfig;
use mediarr_proto::entity::EntityState;
use mediarr_proto::item::{MediaItem, RawItem};
use mediarr_proto::source::SectionKey;

use crate::card_state::CardState;
use crate::sections::{
    JellyfinSection, PlexSection, Radarr2Section, RadarrSection, SeerSection, SonarrSection,
    TmdbSection, TraktSection,
};
use crate::view::CardView;

/// The trait every provider section implements.
pub trait Section: Send + Sync {
    /// DOM identity and configuration prefix.
    fn key(&self) -> SectionKey;

    /// Header label when `<key>_label` is not configured.
    fn default_label(&self) -> &'static str;

    /// Text of the empty-state block.
    fn empty_message(&self) -> &'static str;

    /// Detail-panel body for a real item.
    fn info_markup(&self, item: &MediaItem) -> String;

    fn label(&self, config: &CardConfig) -> String {
        config
            .label_for(self.key())
            .unwrap_or(self.default_label())
            .to_string()
    }

    /// Map one raw provider item into the shared shape.
    fn normalize(&self, raw: &RawItem) -> MediaItem {
        base::normalize(raw)
    }

    /// Provider-specific pre-filtering. Must not touch the delivered list.
    fn filter<'a>(&self, _config: &CardConfig, raw: &'a [RawItem]) -> Cow<'a, [RawItem]> {
        Cow::Borrowed(raw)
    }

    /// Filtered, capped and normalized items of one feed.
    fn items(&self, config: &CardConfig, raw: &[RawItem]) -> Vec<MediaItem> {
        base::items(self, config, raw)
    }

    fn generate_template(&self, config: &CardConfig) -> String {
        base::generate_template(self, config)
    }

    /// Ingest one feed's snapshot.
    fn update(&self, card: &mut CardState, config: &CardConfig, feed: &str, entity: &EntityState) {
        base::update(self, card, config, feed, entity.items());
    }

    fn update_info(&self, view: &mut CardView, config: &CardConfig, item: &MediaItem) {
        base::update_info(self, view, config, item);
    }

    fn generate_media_item(
        &self,
        item: &MediaItem,
        index: usize,
        selected_type: Option<SectionKey>,
        selected_index: usize,
    ) -> String {
        base::generate_media_item(self, item, index, selected_type, selected_index)
    }

    /// Whether the play button applies to `item`.
    fn can_play(&self, _item: &MediaItem) -> bool {
        false
    }
}

/// Key → variant. Built explicitly; nothing registers itself.
pub struct SectionRegistry {
    sections: IndexMap<SectionKey, Box<dyn Section>>,
}

impl SectionRegistry {
    pub fn empty() -> Self {
        Self {
            sections: IndexMap::new(),
        }
    }

    /// Every provider variant.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PlexSection));
        registry.register(Box::new(JellyfinSection));
        registry.register(Box::new(SonarrSection));
        registry.register(Box::new(RadarrSection));
        registry.register(Box::new(Radarr2Section));
        registry.register(Box::new(SeerSection));
        registry.register(Box::new(TmdbSection));
        registry.register(Box::new(TraktSection));
        registry
    }

    /// Add or replace the variant for its key.
    pub fn register(&mut self, section: Box<dyn Section>) {
        self.sections.insert(section.key(), section);
    }

    pub fn get(&self, key: SectionKey) -> Option<&dyn Section> {
        self.sections.get(&key).map(|s| s.as_ref())
    }

    pub fn keys(&self) -> impl Iterator<Item = SectionKey> + '_ {
        self.sections.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Default for SectionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
