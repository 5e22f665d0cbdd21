use mediarr_proto::item::{MediaItem, RawItem};
use mediarr_proto::source::SectionKey;

use super::dated;
use crate::markup::{esc, join_metadata, runtime_text};
use crate::section::{base, Section};

/// Upcoming episodes.
pub struct SonarrSection;

impl Section for SonarrSection {
    fn key(&self) -> SectionKey {
        SectionKey::Sonarr
    }

    fn default_label(&self) -> &'static str {
        "Sonarr Upcoming"
    }

    fn empty_message(&self) -> &'static str {
        "No upcoming episodes"
    }

    fn normalize(&self, raw: &RawItem) -> MediaItem {
        let mut item = base::normalize(raw);
        if item.release.is_none() {
            item.release = raw.first_text(&["airdate", "air_date"]);
        }
        item
    }

    fn info_markup(&self, item: &MediaItem) -> String {
        let metadata = join_metadata(&[
            dated("Airs", item.release.as_deref()),
            runtime_text(item.runtime),
        ]);
        format!(
            "<div class=\"title\">{}</div>{}{}",
            esc(&item.title),
            base::details_markup(&base::episode_line(item)),
            base::metadata_markup(&metadata),
        )
    }
}
