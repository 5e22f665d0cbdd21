//! Card: the update orchestrator.
//!
//! Owns the validated configuration, the section registry and the single
//! [`CardState`]. Every mutation is one synchronous method call; anything
//! that needs the network is handed back to the caller as an [`Effect`].

use mediarr_proto::config::{CardConfig, ConfigError, PlexServer};
use mediarr_proto::entity::StateSnapshot;
use mediarr_proto::source::SectionKey;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::card_state::CardState;
use crate::clients::RemoteClient;
use crate::section::{base, SectionRegistry};
use crate::selection::Selection;

/// Network work requested by the card. Results come back through
/// [`Card::clients_discovered`] and [`Card::play_finished`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Discover {
        generation: u64,
        server: PlexServer,
    },
    Play {
        generation: u64,
        server: PlexServer,
        client_id: String,
        item_key: String,
    },
}

pub struct Card {
    config: CardConfig,
    registry: SectionRegistry,
    /// Configured sections in display order.
    order: Vec<SectionKey>,
    state: CardState,
    seeded: bool,
}

impl Card {
    pub fn new(config: CardConfig) -> Self {
        Self::with_registry(config, SectionRegistry::standard())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(CardConfig::from_toml_str(content)?))
    }

    /// Build the card and its section scaffold.
    pub fn with_registry(config: CardConfig, registry: SectionRegistry) -> Self {
        let mut state = CardState::new(&config);
        let mut order = Vec::new();
        for key in config.section_order() {
            let Some(section) = registry.get(key) else {
                warn!("card: no section registered for {}", key);
                continue;
            };
            state.view.add_section(key, section.generate_template(&config));
            order.push(key);
        }
        info!("card: sections {:?}", order);

        Self {
            config,
            registry,
            order,
            state,
            seeded: false,
        }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn order(&self) -> &[SectionKey] {
        &self.order
    }

    pub fn state(&self) -> &CardState {
        &self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.state.selection
    }

    // ── state delivery ────────────────────────────────────────────────────────

    /// One host tick: the latest snapshot of every entity.
    pub fn set_states(&mut self, states: &StateSnapshot) {
        if !self.seeded {
            self.seed(states);
            self.seeded = true;
        }

        if let Some(player) = &self.config.media_player_entity {
            if self.state.now_playing.reconcile(states.get(player)) {
                debug!("card: now playing updated from {}", player);
            }
        }

        for key in &self.order {
            let Some(section) = self.registry.get(*key) else {
                continue;
            };
            for entity in self.config.feeds_for(*key) {
                if let Some(entity_state) = states.get(&entity.entity_id) {
                    section.update(&mut self.state, &self.config, &entity.config_key, entity_state);
                }
            }
        }
    }

    /// Initial background and selection from the first configured feed's
    /// first item, before any section has stored data.
    fn seed(&mut self, states: &StateSnapshot) {
        let Some(&key) = self.order.first() else {
            return;
        };
        let Some(section) = self.registry.get(key) else {
            return;
        };
        let first = self
            .config
            .feeds_for(key)
            .next()
            .and_then(|entity| states.get(&entity.entity_id))
            .and_then(|entity| entity.items().first());
        let Some(raw) = first else {
            debug!("card: nothing to seed from {}", key);
            return;
        };

        let item = section.normalize(raw);
        self.state.selection.focus(key, 0);
        section.update_info(&mut self.state.view, &self.config, &item);
        self.state.selection.mark_rendered(key, item);
        info!("card: initial selection {} #0", key);
    }

    // ── interaction ───────────────────────────────────────────────────────────

    pub fn apply(&mut self, action: Action) -> Option<Effect> {
        debug!("card: action {:?}", action);
        match action {
            Action::SelectItem { section, index } => {
                self.select(section, index);
                None
            }
            Action::Advance => {
                self.advance();
                None
            }
            Action::ToggleSection(section) => {
                self.toggle_section(section);
                None
            }
            Action::PlayFocused => self.request_play(),
            Action::ChooseClient(client_id) => self.choose_client(&client_id),
            Action::CloseSelector => {
                self.close_selector();
                None
            }
        }
    }

    /// Focus `index` of `section` (clamped to the last item). No-op for
    /// unconfigured or empty sections and for the sentinel.
    pub fn select(&mut self, key: SectionKey, index: usize) -> bool {
        if !self.order.contains(&key) {
            debug!("card: select on unconfigured section {}", key);
            return false;
        }
        let Some(section) = self.registry.get(key) else {
            return false;
        };

        let list = self.state.merged(key);
        match list.first() {
            None => return false,
            Some(first) if first.is_empty_sentinel() => return false,
            Some(_) => {}
        }

        let index = index.min(list.len() - 1);
        let previous = self.state.selection.selected_type();
        self.state.selection.focus(key, index);

        let item = &list[index];
        if self.state.selection.needs_render(key, item) {
            section.update_info(&mut self.state.view, &self.config, item);
            self.state.selection.mark_rendered(key, item.clone());
        }

        if let Some(previous) = previous.filter(|p| *p != key) {
            self.render_list(previous);
        }
        self.render_list(key);
        true
    }

    /// Rotate to the next real item across sections.
    pub fn advance(&mut self) -> bool {
        let lengths: Vec<(SectionKey, usize)> = self
            .order
            .iter()
            .map(|key| (*key, self.state.real_len(*key)))
            .collect();
        match self.state.selection.advance(&lengths) {
            Some((key, index)) => self.select(key, index),
            None => false,
        }
    }

    /// Collapse or expand a section. Returns the new collapsed flag.
    pub fn toggle_section(&mut self, key: SectionKey) -> Option<bool> {
        self.state.view.toggle_collapsed(key)
    }

    /// Play button: open the client selector for the focused item.
    pub fn request_play(&mut self) -> Option<Effect> {
        let key = self.state.selection.selected_type()?;
        let section = self.registry.get(key)?;
        let item = self
            .state
            .merged(key)
            .into_iter()
            .nth(self.state.selection.selected_index())?;
        if item.is_empty_sentinel() || !section.can_play(&item) {
            return None;
        }
        let item_key = item.key?;
        let Some(server) = self.config.plex.clone() else {
            warn!("card: plex_url and plex_token are required for remote play");
            return None;
        };

        let generation = self.state.selector.open(item_key);
        info!("card: client selector opened (generation {})", generation);
        Some(Effect::Discover { generation, server })
    }

    pub fn clients_discovered(&mut self, generation: u64, clients: Vec<RemoteClient>) -> bool {
        self.state.selector.apply_clients(generation, clients)
    }

    pub fn choose_client(&mut self, client_id: &str) -> Option<Effect> {
        let target = self.state.selector.choose(client_id)?;
        let server = self.config.plex.clone()?;
        Some(Effect::Play {
            generation: target.generation,
            server,
            client_id: target.client_id,
            item_key: target.item_key,
        })
    }

    pub fn play_finished(&mut self, generation: u64, success: bool) -> bool {
        self.state.selector.play_finished(generation, success)
    }

    pub fn close_selector(&mut self) {
        self.state.selector.close();
    }

    // ── rendering ─────────────────────────────────────────────────────────────

    fn render_list(&mut self, key: SectionKey) {
        if let Some(section) = self.registry.get(key) {
            base::render_list(section, &mut self.state);
        }
    }

    /// The whole card document.
    pub fn render(&self) -> String {
        self.state
            .view
            .render(&self.state.now_playing, &self.state.selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediarr_proto::entity::{Attributes, EntityState};
    use serde_json::json;

    fn feed(items: serde_json::Value) -> EntityState {
        EntityState {
            state: "ok".into(),
            attributes: Attributes {
                data: serde_json::from_value(items).unwrap(),
                ..Attributes::default()
            },
        }
    }

    fn plex_card() -> Card {
        Card::from_toml_str(
            r#"
            plex_entity = "sensor.plex"
            sonarr_entity = "sensor.sonarr"
            plex_url = "http://plex.local:32400"
            plex_token = "tok"
            "#,
        )
        .unwrap()
    }

    fn states() -> StateSnapshot {
        let mut states = StateSnapshot::new();
        states.insert(
            "sensor.plex".into(),
            feed(json!([
                { "title": "Alien", "key": "101", "fanart": "alien.jpg" },
                { "title": "Aliens", "key": "102" },
            ])),
        );
        states.insert("sensor.sonarr".into(), feed(json!([{ "title": "Andor" }])));
        states
    }

    #[test]
    fn test_first_delivery_seeds_selection() {
        let mut card = plex_card();
        card.set_states(&states());
        assert_eq!(card.selection().selected_type(), Some(SectionKey::Plex));
        assert_eq!(card.selection().selected_index(), 0);
        assert_eq!(card.state().view.background.image.as_deref(), Some("alien.jpg"));
        assert_eq!(card.state().view.info_renders, 1);
        assert!(card.state().view.play_button_visible);

        card.set_states(&states());
        assert_eq!(card.state().view.info_renders, 1);
    }

    #[test]
    fn test_select_marks_exactly_one_entry() {
        let mut card = plex_card();
        card.set_states(&states());

        assert!(card.select(SectionKey::Sonarr, 5));
        assert_eq!(card.selection().selected_index(), 0);
        let html = card.render();
        assert_eq!(html.matches("media-item selected").count(), 1);
        assert!(html.contains("media-item selected\" data-type=\"sonarr\""));

        assert!(!card.select(SectionKey::Tmdb, 0));
        assert_eq!(card.selection().selected_type(), Some(SectionKey::Sonarr));
    }

    #[test]
    fn test_advance_wraps_across_sections() {
        let mut card = plex_card();
        card.set_states(&states());
        card.advance();
        assert_eq!(card.selection().selected_index(), 1);
        card.advance();
        assert_eq!(card.selection().selected_type(), Some(SectionKey::Sonarr));
        card.advance();
        assert_eq!(card.selection().selected_type(), Some(SectionKey::Plex));
        assert_eq!(card.selection().selected_index(), 0);
    }

    #[test]
    fn test_play_flow_effects() {
        let mut card = plex_card();
        card.set_states(&states());

        let Some(Effect::Discover { generation, server }) = card.apply(Action::PlayFocused) else {
            panic!("expected discovery");
        };
        assert_eq!(server.url, "http://plex.local:32400");

        let client = RemoteClient {
            name: "TV".into(),
            product: "Plex for Android (TV)".into(),
            version: "1".into(),
            client_id: "tv-1".into(),
        };
        assert!(card.clients_discovered(generation, vec![client]));

        let effect = card.apply(Action::ChooseClient("tv-1".into()));
        assert_eq!(
            effect,
            Some(Effect::Play {
                generation,
                server,
                client_id: "tv-1".into(),
                item_key: "101".into(),
            })
        );
        assert!(card.play_finished(generation, true));
        assert!(!card.state().selector.is_open());
    }

    #[test]
    fn test_discovery_after_close_leaves_modal_hidden() {
        let mut card = plex_card();
        card.set_states(&states());

        let Some(Effect::Discover { generation, .. }) = card.apply(Action::PlayFocused) else {
            panic!("expected discovery");
        };
        card.apply(Action::CloseSelector);

        let client = RemoteClient {
            name: "TV".into(),
            product: "Plex for Android (TV)".into(),
            version: "1".into(),
            client_id: "tv-1".into(),
        };
        assert!(!card.clients_discovered(generation, vec![client]));
        assert!(!card.state().selector.is_open());
        assert!(!card.render().contains("data-client-id"));
        assert_eq!(card.apply(Action::ChooseClient("tv-1".into())), None);
    }

    #[test]
    fn test_play_not_offered_for_other_sections() {
        let mut card = plex_card();
        card.set_states(&states());
        card.select(SectionKey::Sonarr, 0);
        assert!(!card.state().view.play_button_visible);
        assert_eq!(card.apply(Action::PlayFocused), None);
    }

    #[test]
    fn test_toggle_section() {
        let mut card = plex_card();
        assert_eq!(card.toggle_section(SectionKey::Plex), Some(true));
        assert!(card.render().contains("section-content collapsed"));
        assert_eq!(card.toggle_section(SectionKey::Radarr), None);
    }
}
