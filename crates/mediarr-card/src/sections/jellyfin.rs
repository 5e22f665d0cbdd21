use mediarr_proto::item::MediaItem;
use mediarr_proto::source::SectionKey;

use super::dated;
use crate::markup::{join_metadata, runtime_text};
use crate::section::{base, Section};

pub struct JellyfinSection;

impl Section for JellyfinSection {
    fn key(&self) -> SectionKey {
        SectionKey::Jellyfin
    }

    fn default_label(&self) -> &'static str {
        "Jellyfin Recently Added"
    }

    fn empty_message(&self) -> &'static str {
        "No recently added media"
    }

    fn info_markup(&self, item: &MediaItem) -> String {
        let metadata = join_metadata(&[
            dated("Released", item.release.as_deref()),
            runtime_text(item.runtime),
        ]);
        format!(
            "{}{}{}",
            base::title_markup(item),
            base::details_markup(&base::episode_line(item)),
            base::metadata_markup(&metadata),
        )
    }
}
