use mediarr_proto::item::{MediaItem, RawItem};
use mediarr_proto::source::SectionKey;

use super::catalog_info;
use crate::section::{base, Section};

pub struct TmdbSection;

impl Section for TmdbSection {
    fn key(&self) -> SectionKey {
        SectionKey::Tmdb
    }

    fn default_label(&self) -> &'static str {
        "TMDB"
    }

    fn empty_message(&self) -> &'static str {
        "No TMDB items"
    }

    fn normalize(&self, raw: &RawItem) -> MediaItem {
        let mut item = base::normalize(raw);
        if item.fanart.is_empty() {
            item.fanart = raw.text("backdrop").unwrap_or_default();
        }
        if item.title.is_empty() {
            item.title = raw.text("name").unwrap_or_default();
        }
        item
    }

    fn info_markup(&self, item: &MediaItem) -> String {
        catalog_info(item)
    }
}
