//! Shared section behaviour. The trait's default methods delegate here.

use mediarr_proto::config::CardConfig;
use mediarr_proto::item::{MediaItem, RawItem};
use mediarr_proto::source::SectionKey;
use tracing::debug;

use super::Section;
use crate::card_state::CardState;
use crate::markup::{esc, year_of};
use crate::view::CardView;

/// Field mapping common to every provider.
pub fn normalize(raw: &RawItem) -> MediaItem {
    let release = raw.text("release");
    MediaItem {
        title: raw.text("title").unwrap_or_default(),
        year: raw
            .text("year")
            .or_else(|| release.as_deref().and_then(year_of)),
        poster: raw.text("poster").unwrap_or_default(),
        fanart: raw.text("fanart").unwrap_or_default(),
        overview: raw.text("overview"),
        genres: raw.genres(),
        runtime: raw.runtime(),
        release,
        episode: raw.text("episode"),
        number: raw.text("number"),
        key: raw.text("key"),
        title_default: raw.is_sentinel(),
    }
}

/// Normalized list for one feed.
///
/// A provider sentinel in first position passes through (artwork kept) and
/// skips filtering. Otherwise sentinels are dropped, the variant filter
/// runs, and the result is capped. Nothing left means the sentinel.
pub fn items<S: Section + ?Sized>(section: &S, config: &CardConfig, raw: &[RawItem]) -> Vec<MediaItem> {
    match raw.first() {
        None => return vec![MediaItem::empty()],
        Some(first) if first.is_sentinel() => {
            let mut sentinel = section.normalize(first);
            sentinel.title_default = true;
            return vec![sentinel];
        }
        Some(_) => {}
    }

    let cap = config.max_items_for(section.key());
    let filtered = section.filter(config, raw);
    let items: Vec<MediaItem> = filtered
        .iter()
        .filter(|r| !r.is_sentinel())
        .take(cap)
        .map(|r| section.normalize(r))
        .collect();

    if items.is_empty() {
        vec![MediaItem::empty()]
    } else {
        items
    }
}

pub fn generate_template<S: Section + ?Sized>(section: &S, config: &CardConfig) -> String {
    let key = section.key();
    format!(
        "<div class=\"section\" data-section=\"{key}\">\
         <div class=\"section-header\"><div class=\"section-header-content\">\
         <ha-icon class=\"section-toggle-icon\" icon=\"mdi:chevron-down\"></ha-icon>\
         <div class=\"section-label\">{label}</div>\
         </div></div>\
         <div class=\"section-content\"><div class=\"{key}-list\"></div></div>\
         </div>",
        label = esc(&section.label(config)),
    )
}

/// Store one feed, keep the focused item consistent, redraw the list.
pub fn update<S: Section + ?Sized>(
    section: &S,
    card: &mut CardState,
    config: &CardConfig,
    feed: &str,
    raw: &[RawItem],
) {
    let key = section.key();
    let items = section.items(config, raw);
    debug!("section {}: feed {} -> {} items", key, feed, items.len());
    card.store_feed(key, feed, items);

    if card.selection.is_focused(key) {
        let list = card.merged(key);
        if list.is_empty() {
            card.selection.clear();
        } else {
            card.selection.clamp_to(list.len());
            let item = &list[card.selection.selected_index()];
            if card.selection.needs_render(key, item) {
                section.update_info(&mut card.view, config, item);
                card.selection.mark_rendered(key, item.clone());
            }
        }
    }

    render_list(section, card);
}

/// Rebuild the list container from the merged feeds.
pub fn render_list<S: Section + ?Sized>(section: &S, card: &mut CardState) {
    let key = section.key();
    let selected_type = card.selection.selected_type();
    let selected_index = card.selection.selected_index();
    let html: String = card
        .merged(key)
        .iter()
        .enumerate()
        .map(|(index, item)| section.generate_media_item(item, index, selected_type, selected_index))
        .collect();
    card.view.set_list(key, html);
}

/// Background layer plus detail panel. The sentinel clears the panel but
/// its artwork still reaches the background.
pub fn update_info<S: Section + ?Sized>(
    section: &S,
    view: &mut CardView,
    config: &CardConfig,
    item: &MediaItem,
) {
    if let Some(art) = item.background_art() {
        view.background.image = Some(art.to_string());
    }
    view.background.opacity = config.opacity;
    view.background.blur_radius = config.blur_radius;

    if item.is_empty_sentinel() {
        view.info_html.clear();
        view.play_button_visible = false;
    } else {
        view.info_html = section.info_markup(item);
        view.play_button_visible = section.can_play(item);
    }
    view.info_renders += 1;
}

pub fn generate_media_item<S: Section + ?Sized>(
    section: &S,
    item: &MediaItem,
    index: usize,
    selected_type: Option<SectionKey>,
    selected_index: usize,
) -> String {
    if item.is_empty_sentinel() {
        return empty_markup(section.empty_message());
    }

    let key = section.key();
    let selected = if selected_type == Some(key) && index == selected_index {
        " selected"
    } else {
        ""
    };
    format!(
        "<div class=\"media-item{selected}\" data-type=\"{key}\" data-index=\"{index}\">\
         <img src=\"{poster}\" alt=\"{title}\">\
         <div class=\"media-item-title\">{title}</div></div>",
        poster = esc(&item.poster),
        title = esc(&item.title),
    )
}

pub fn empty_markup(message: &str) -> String {
    format!(
        "<div class=\"empty-section-content\"><div class=\"empty-message\">{}</div></div>",
        esc(message)
    )
}

// ── detail-panel pieces ───────────────────────────────────────────────────────

/// `Title (year)`.
pub fn title_markup(item: &MediaItem) -> String {
    let year = item
        .year
        .as_deref()
        .map(|y| format!(" ({})", esc(y)))
        .unwrap_or_default();
    format!("<div class=\"title\">{}{}</div>", esc(&item.title), year)
}

pub fn details_markup(text: &str) -> String {
    format!("<div class=\"details\">{}</div>", esc(text))
}

pub fn metadata_markup(text: &str) -> String {
    format!("<div class=\"metadata\">{}</div>", esc(text))
}

pub fn overview_markup(item: &MediaItem) -> String {
    item.overview
        .as_deref()
        .map(|o| format!("<div class=\"overview\">{}</div>", esc(o)))
        .unwrap_or_default()
}

/// `number - episode`, empty for items without an episode.
pub fn episode_line(item: &MediaItem) -> String {
    match &item.episode {
        Some(episode) => format!("{} - {}", item.number.as_deref().unwrap_or_default(), episode),
        None => String::new(),
    }
}
