//! Selection: which section/item drives the background and detail panel.

use mediarr_proto::item::MediaItem;
use mediarr_proto::source::SectionKey;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected_type: Option<SectionKey>,
    selected_index: usize,
    /// Section and item the detail panel currently shows.
    last_rendered: Option<(SectionKey, MediaItem)>,
}

impl Selection {
    pub fn selected_type(&self) -> Option<SectionKey> {
        self.selected_type
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn last_rendered(&self) -> Option<(SectionKey, &MediaItem)> {
        self.last_rendered.as_ref().map(|(key, item)| (*key, item))
    }

    pub fn is_focused(&self, key: SectionKey) -> bool {
        self.selected_type == Some(key)
    }

    pub fn focus(&mut self, key: SectionKey, index: usize) {
        self.selected_type = Some(key);
        self.selected_index = index;
    }

    pub fn clear(&mut self) {
        self.selected_type = None;
        self.selected_index = 0;
    }

    /// Pull the index back inside a list of `len` items. Returns `true` if it moved.
    pub fn clamp_to(&mut self, len: usize) -> bool {
        if len == 0 {
            let had = self.selected_type.is_some();
            self.clear();
            return had;
        }
        if self.selected_index >= len {
            self.selected_index = len - 1;
            return true;
        }
        false
    }

    /// Equal items from different sections render different panels.
    pub fn needs_render(&self, key: SectionKey, item: &MediaItem) -> bool {
        self.last_rendered() != Some((key, item))
    }

    pub fn mark_rendered(&mut self, key: SectionKey, item: MediaItem) {
        self.last_rendered = Some((key, item));
    }

    /// Next position when rotating.
    ///
    /// `lengths` lists every section in display order with its number of
    /// real items. Moves to the next item of the focused section, then on to
    /// the next section that has real items, wrapping around.
    pub fn advance(&self, lengths: &[(SectionKey, usize)]) -> Option<(SectionKey, usize)> {
        let current = self
            .selected_type
            .and_then(|key| lengths.iter().position(|(k, _)| *k == key));

        let Some(pos) = current else {
            return lengths
                .iter()
                .find(|(_, len)| *len > 0)
                .map(|(key, _)| (*key, 0));
        };

        let (key, len) = lengths[pos];
        if self.selected_index + 1 < len {
            return Some((key, self.selected_index + 1));
        }

        (1..=lengths.len())
            .map(|step| lengths[(pos + step) % lengths.len()])
            .find(|(_, len)| *len > 0)
            .map(|(key, _)| (key, 0))
    }
}
