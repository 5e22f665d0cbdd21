//! Provider variants of [`Section`](crate::section::Section).

mod jellyfin;
mod plex;
mod radarr;
mod radarr2;
mod seer;
mod sonarr;
mod tmdb;
mod trakt;

pub use jellyfin::JellyfinSection;
pub use plex::PlexSection;
pub use radarr::RadarrSection;
pub use radarr2::{filter_release_types, Radarr2Section, DEFAULT_RELEASE_TYPES};
pub use seer::SeerSection;
pub use sonarr::SonarrSection;
pub use tmdb::TmdbSection;
pub use trakt::TraktSection;

use mediarr_proto::item::MediaItem;

use crate::markup::{display_date, join_metadata, runtime_text};
use crate::section::base;

/// Detail panel shared by the catalog providers (request managers,
/// metadata indexes): title, genres, release date, runtime, overview.
fn catalog_info(item: &MediaItem) -> String {
    let metadata = join_metadata(&[
        item.release.as_deref().map(display_date),
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

/// `<label>: <date>` for library providers; absent dates read `Unknown`.
fn dated(label: &str, release: Option<&str>) -> Option<String> {
    let date = release.map(display_date).unwrap_or_else(|| "Unknown".to_string());
    Some(format!("{}: {}", label, date))
}
