use mediarr_proto::item::MediaItem;
use mediarr_proto::source::SectionKey;

use crate::markup::{join_metadata, runtime_text};
use crate::section::{base, Section};

pub struct RadarrSection;

impl Section for RadarrSection {
    fn key(&self) -> SectionKey {
        SectionKey::Radarr
    }

    fn default_label(&self) -> &'static str {
        "Radarr Upcoming"
    }

    fn empty_message(&self) -> &'static str {
        "No upcoming movies"
    }

    fn info_markup(&self, item: &MediaItem) -> String {
        let metadata = join_metadata(&[
            item.release.as_ref().map(|r| format!("Release: {}", r)),
            runtime_text(item.runtime),
        ]);
        format!(
            "{}{}{}{}",
            base::title_markup(item),
            base::details_markup(item.genres.as_deref().unwrap_or_default()),
            base::metadata_markup(&metadata),
            base::overview_markup(item),
        )
    }
}
