//! Dashboard card core: provider sections, selection, now-playing overlay
//! and Plex remote play, rendered to one HTML document.

pub mod action;
pub mod card;
pub mod card_state;
pub mod client_selector;
pub mod clients;
pub mod core;
pub mod http;
pub mod markup;
pub mod now_playing;
pub mod section;
pub mod sections;
pub mod selection;
pub mod view;

pub use card::{Card, Effect};
