//! Now-playing overlay: mirrors a media player entity.
//!
//! # States
//! ```text
//!  Hidden    no entity, or state is unavailable / idle / off
//!  Visible  anything else; title, subtitle, picture and progress shown
//! ```
//!
//! The overlay is independent of section selection: section updates never
//! touch it and it never touches the selection.

use mediarr_proto::entity::EntityState;
use tracing::debug;

use crate::markup::{css_url, esc, format_percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPlaying {
    overlay: Overlay,
    title: String,
    subtitle: String,
    /// Last computed progress in percent. Kept when a tick carries no usable
    /// position/duration pair.
    progress_pct: Option<f64>,
    picture: Option<String>,
}

impl NowPlaying {
    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn is_visible(&self) -> bool {
        self.overlay == Overlay::Visible
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn progress_pct(&self) -> Option<f64> {
        self.progress_pct
    }

    pub fn picture(&self) -> Option<&str> {
        self.picture.as_deref()
    }

    /// Apply the latest player snapshot. Returns `true` if anything changed.
    pub fn reconcile(&mut self, entity: Option<&EntityState>) -> bool {
        let before = self.clone();

        match entity {
            Some(entity) if entity.is_player_active() => {
                let attrs = &entity.attributes;
                self.overlay = Overlay::Visible;
                self.title = attrs.media_title.clone().unwrap_or_default();
                self.subtitle = attrs.media_series_title.clone().unwrap_or_default();

                if let (Some(position), Some(duration)) = (attrs.media_position, attrs.media_duration) {
                    if duration > 0.0 && position.is_finite() && duration.is_finite() {
                        self.progress_pct = Some(position / duration * 100.0);
                    }
                }

                if let Some(picture) = attrs.entity_picture.as_ref().filter(|p| !p.is_empty()) {
                    self.picture = Some(picture.clone());
                }
            }
            _ => self.overlay = Overlay::Hidden,
        }

        let changed = *self != before;
        if changed && before.overlay != self.overlay {
            debug!("now playing: {:?} -> {:?}", before.overlay, self.overlay);
        }
        changed
    }

    pub fn overlay_html(&self) -> String {
        let hidden = if self.is_visible() { "" } else { " hidden" };
        let background = self
            .picture
            .as_deref()
            .map(|p| format!(" style=\"background-image: {}\"", css_url(p)))
            .unwrap_or_default();
        let progress = self
            .progress_pct
            .map(|p| format!(" style=\"width: {}\"", format_percent(p)))
            .unwrap_or_default();

        format!(
            "<div class=\"now-playing{hidden}\">\
             <div class=\"now-playing-background\"{background}></div>\
             <div class=\"now-playing-content\"><div class=\"now-playing-info\">\
             <div class=\"now-playing-title\">{title}</div>\
             <div class=\"now-playing-subtitle\">{subtitle}</div>\
             </div></div>\
             <div class=\"progress-bar\"><div class=\"progress-bar-fill\"{progress}></div></div>\
             </div>",
            title = esc(&self.title),
            subtitle = esc(&self.subtitle),
        )
    }
}
