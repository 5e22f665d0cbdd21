use mediarr_proto::item::MediaItem;
use mediarr_proto::source::SectionKey;

use super::dated;
use crate::markup::{join_metadata, runtime_text};
use crate::section::{base, Section};

/// Recently added items of a Plex library. The only variant that can play.
pub struct PlexSection;

impl Section for PlexSection {
    fn key(&self) -> SectionKey {
        SectionKey::Plex
    }

    fn default_label(&self) -> &'static str {
        "Plex Recently Added"
    }

    fn empty_message(&self) -> &'static str {
        "No recently added media"
    }

    fn info_markup(&self, item: &MediaItem) -> String {
        let metadata = join_metadata(&[
            dated("Added", item.release.as_deref()),
            runtime_text(item.runtime),
        ]);
        format!(
            "{}{}{}",
            base::title_markup(item),
            base::details_markup(&base::episode_line(item)),
            base::metadata_markup(&metadata),
        )
    }

    fn can_play(&self, item: &MediaItem) -> bool {
        item.key.is_some()
    }
}
