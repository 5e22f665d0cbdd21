//! Action enum: every user-initiated intent the card understands.

use mediarr_proto::source::SectionKey;

/// All actions that can flow into [`Card::apply`](crate::card::Card::apply).
/// The host produces them from clicks and timers; the card dispatches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Selection ────────────────────────────────────────────────────────────
    /// Click on a list entry (`data-type`, `data-index`).
    SelectItem { section: SectionKey, index: usize },
    /// Rotate to the next real item.
    Advance,

    // ── Layout ───────────────────────────────────────────────────────────────
    ToggleSection(SectionKey),

    // ── Remote play ──────────────────────────────────────────────────────────
    /// Play button on the detail panel.
    PlayFocused,
    /// Click on a client in the selector (`data-client-id`).
    ChooseClient(String),
    /// Close button, or a click outside the modal content.
    CloseSelector,
}
