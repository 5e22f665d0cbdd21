//! CardView: the rendered card as a set of named slots.
//!
//! Sections and the orchestrator patch individual slots (background, detail
//! panel, list containers); `render` stitches the slots into one document.
//! Section templates are produced once from configuration and only their
//! list container is filled in afterwards.

use indexmap::IndexMap;
use mediarr_proto::source::SectionKey;

use crate::client_selector::ClientSelector;
use crate::markup::{css_url, STYLES};
use crate::now_playing::NowPlaying;

/// Background layer behind the detail panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Background {
    pub image: Option<String>,
    pub opacity: f32,
    pub blur_radius: u32,
}

/// One section's scaffold plus its current list markup.
#[derive(Debug, Clone, Default)]
pub struct SectionSlot {
    pub template: String,
    pub list_html: String,
    pub collapsed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CardView {
    pub sections: IndexMap<SectionKey, SectionSlot>,
    pub background: Background,
    pub info_html: String,
    pub play_button_visible: bool,
    /// Number of detail-panel renders so far.
    pub info_renders: u64,
}

impl CardView {
    pub fn add_section(&mut self, key: SectionKey, template: String) {
        self.sections.insert(
            key,
            SectionSlot {
                template,
                ..SectionSlot::default()
            },
        );
    }

    pub fn set_list(&mut self, key: SectionKey, html: String) {
        if let Some(slot) = self.sections.get_mut(&key) {
            slot.list_html = html;
        }
    }

    pub fn list_html(&self, key: SectionKey) -> Option<&str> {
        self.sections.get(&key).map(|s| s.list_html.as_str())
    }

    /// Flip the collapsed flag of a section. Returns the new state.
    pub fn toggle_collapsed(&mut self, key: SectionKey) -> Option<bool> {
        let slot = self.sections.get_mut(&key)?;
        slot.collapsed = !slot.collapsed;
        Some(slot.collapsed)
    }

    pub fn is_collapsed(&self, key: SectionKey) -> bool {
        self.sections.get(&key).is_some_and(|s| s.collapsed)
    }

    fn background_style(&self) -> String {
        let mut style = format!(
            "opacity: {}; filter: blur({}px)",
            self.background.opacity, self.background.blur_radius
        );
        if let Some(image) = &self.background.image {
            style = format!("background-image: {}; {}", css_url(image), style);
        }
        style
    }

    fn section_html(key: SectionKey, slot: &SectionSlot) -> String {
        let container = format!("<div class=\"{}-list\"></div>", key);
        let filled = format!("<div class=\"{}-list\">{}</div>", key, slot.list_html);
        let mut html = slot.template.replacen(&container, &filled, 1);
        if slot.collapsed {
            html = html
                .replacen(
                    "class=\"section-content\"",
                    "class=\"section-content collapsed\"",
                    1,
                )
                .replacen(
                    "class=\"section-toggle-icon\"",
                    "class=\"section-toggle-icon\" style=\"transform: rotate(-90deg)\"",
                    1,
                );
        }
        html
    }

    /// The whole card document.
    pub fn render(&self, now_playing: &NowPlaying, selector: &ClientSelector) -> String {
        let mut html = String::with_capacity(4096);
        html.push_str("<ha-card><div class=\"card-background\"></div><div class=\"card-content\">");
        html.push_str(&selector.modal_html());
        html.push_str(&now_playing.overlay_html());

        html.push_str("<div class=\"media-content\">");
        html.push_str(&format!(
            "<div class=\"media-background\" style=\"{}\"></div>",
            self.background_style()
        ));
        html.push_str(&format!("<div class=\"media-info\">{}</div>", self.info_html));
        html.push_str(&format!(
            "<div class=\"play-button{}\"><ha-icon class=\"play-icon\" icon=\"mdi:play-circle-outline\"></ha-icon></div>",
            if self.play_button_visible { "" } else { " hidden" }
        ));
        html.push_str("</div>");

        for (key, slot) in &self.sections {
            html.push_str(&Self::section_html(*key, slot));
        }

        html.push_str("</div></ha-card>");
        html.push_str(&format!("<style>{}</style>", STYLES));
        html
    }
}
