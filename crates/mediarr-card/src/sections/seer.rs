use mediarr_proto::item::{MediaItem, RawItem};
use mediarr_proto::source::SectionKey;

use super::catalog_info;
use crate::section::{base, Section};

/// Request-manager feeds (requests, trending, discover, popular).
pub struct SeerSection;

impl Section for SeerSection {
    fn key(&self) -> SectionKey {
        SectionKey::Seer
    }

    fn default_label(&self) -> &'static str {
        "Seer Requests"
    }

    fn empty_message(&self) -> &'static str {
        "No requests"
    }

    fn normalize(&self, raw: &RawItem) -> MediaItem {
        let mut item = base::normalize(raw);
        if item.title.is_empty() {
            item.title = raw.text("name").unwrap_or_default();
        }
        item
    }

    fn info_markup(&self, item: &MediaItem) -> String {
        catalog_info(item)
    }
}
