//! Upcoming movies filtered by release type.
//!
//! Radarr reports releases as `"<Type> - <date>"` (e.g. `"Digital - 2024-04-16"`).
//! Only items whose release mentions one of the configured types are shown.

use std::borrow::Cow;

use chrono::NaiveDate;
use mediarr_proto::config::CardConfig;
use mediarr_proto::item::{MediaItem, RawItem};
use mediarr_proto::source::SectionKey;

use crate::markup::{format_date, join_metadata, runtime_text};
use crate::section::{base, Section};

pub const DEFAULT_RELEASE_TYPES: [&str; 3] = ["Digital", "Theaters", "Physical"];

/// Items whose `release` contains one of `types`, capped at `cap`.
///
/// Returns a new list; `raw` is left as delivered. A list led by the
/// provider sentinel is passed through unfiltered (still capped).
pub fn filter_release_types<T: AsRef<str>>(raw: &[RawItem], types: &[T], cap: usize) -> Vec<RawItem> {
    if raw.first().is_some_and(RawItem::is_sentinel) {
        return raw.iter().take(cap).cloned().collect();
    }
    raw.iter()
        .filter(|item| {
            item.text("release")
                .is_some_and(|release| types.iter().any(|t| release.contains(t.as_ref())))
        })
        .take(cap)
        .cloned()
        .collect()
}

/// Date part of a release string, `None` for unknown or unparsable dates.
fn release_date(release: &str) -> Option<String> {
    if release.contains("Unknown") {
        return None;
    }
    let date = release.split(" - ").nth(1).unwrap_or(release).trim();
    format_date(date).or_else(|| {
        NaiveDate::parse_from_str(date, "%B %d, %Y")
            .ok()
            .map(|d| d.format("%-m/%-d/%Y").to_string())
    })
}

pub struct Radarr2Section;

impl Section for Radarr2Section {
    fn key(&self) -> SectionKey {
        SectionKey::Radarr2
    }

    fn default_label(&self) -> &'static str {
        "Upcoming Movies"
    }

    fn empty_message(&self) -> &'static str {
        "No upcoming Movies"
    }

    fn filter<'a>(&self, config: &CardConfig, raw: &'a [RawItem]) -> Cow<'a, [RawItem]> {
        let cap = config.max_items_for(self.key());
        let filtered = match config.release_types_for(self.key()) {
            Some(types) => filter_release_types(raw, types, cap),
            None => filter_release_types(raw, &DEFAULT_RELEASE_TYPES, cap),
        };
        Cow::Owned(filtered)
    }

    fn info_markup(&self, item: &MediaItem) -> String {
        let metadata = join_metadata(&[
            item.release.as_deref().and_then(release_date),
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
