use mediarr_proto::item::MediaItem;
use mediarr_proto::source::SectionKey;

use super::catalog_info;
use crate::section::Section;

pub struct TraktSection;

impl Section for TraktSection {
    fn key(&self) -> SectionKey {
        SectionKey::Trakt
    }

    fn default_label(&self) -> &'static str {
        "Trakt Popular"
    }

    fn empty_message(&self) -> &'static str {
        "No trending items"
    }

    fn info_markup(&self, item: &MediaItem) -> String {
        catalog_info(item)
    }
}
