//! Client selector modal.
//!
//! ```text
//!  Hidden ──open──▶ Loading ──clients──▶ Ready ──play ok──▶ Hidden
//!     ▲                │                   │
//!     └─────close──────┴───────close───────┘
//! ```
//!
//! Every `open` bumps the generation. Discovery results and play outcomes
//! carry the generation they were issued for and are dropped when the modal
//! has been closed or reopened since.

use tracing::debug;

use crate::clients::RemoteClient;
use crate::markup::esc;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectorState {
    #[default]
    Hidden,
    Loading {
        generation: u64,
        item_key: String,
    },
    Ready {
        generation: u64,
        item_key: String,
        clients: Vec<RemoteClient>,
    },
}

/// A remote-play command the host should issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayTarget {
    pub generation: u64,
    pub client_id: String,
    pub item_key: String,
}

#[derive(Debug, Clone, Default)]
pub struct ClientSelector {
    state: SelectorState,
    generation: u64,
}

impl ClientSelector {
    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, SelectorState::Hidden)
    }

    /// Open for `item_key` and return the generation discovery must report back with.
    pub fn open(&mut self, item_key: String) -> u64 {
        self.generation += 1;
        self.state = SelectorState::Loading {
            generation: self.generation,
            item_key,
        };
        self.generation
    }

    pub fn close(&mut self) {
        self.state = SelectorState::Hidden;
    }

    /// Apply a discovery result. Ignored unless the modal is still waiting
    /// for exactly this generation.
    pub fn apply_clients(&mut self, generation: u64, clients: Vec<RemoteClient>) -> bool {
        match &self.state {
            SelectorState::Loading {
                generation: current,
                item_key,
            } if *current == generation => {
                self.state = SelectorState::Ready {
                    generation,
                    item_key: item_key.clone(),
                    clients,
                };
                true
            }
            _ => {
                debug!("client selector: dropping stale discovery result ({})", generation);
                false
            }
        }
    }

    /// Resolve a click on a listed client.
    pub fn choose(&self, client_id: &str) -> Option<PlayTarget> {
        match &self.state {
            SelectorState::Ready {
                generation,
                item_key,
                clients,
            } if clients.iter().any(|c| c.client_id == client_id) => Some(PlayTarget {
                generation: *generation,
                client_id: client_id.to_string(),
                item_key: item_key.clone(),
            }),
            _ => None,
        }
    }

    /// Outcome of a play command. Success closes the modal it was issued from;
    /// failure leaves it open.
    pub fn play_finished(&mut self, generation: u64, success: bool) -> bool {
        let current = matches!(
            self.state,
            SelectorState::Ready { generation: g, .. } if g == generation
        );
        if current && success {
            self.close();
            return true;
        }
        false
    }

    pub fn modal_html(&self) -> String {
        let hidden = if self.is_open() { "" } else { " hidden" };
        let list = match &self.state {
            SelectorState::Hidden => String::new(),
            SelectorState::Loading { .. } => {
                "<div class=\"client-list-loading\">Searching for clients…</div>".to_string()
            }
            SelectorState::Ready { clients, .. } if clients.is_empty() => {
                "<div class=\"client-list-empty\">\
                 <div class=\"client-list-empty-title\">No Available Clients</div>\
                 <div class=\"client-list-empty-hint\">Make sure your Plex clients are online and connected.</div>\
                 </div>"
                    .to_string()
            }
            SelectorState::Ready { clients, .. } => clients
                .iter()
                .map(|c| {
                    format!(
                        "<div class=\"client-item\" data-client-id=\"{}\">\
                         <ha-icon class=\"client-item-icon\" icon=\"mdi:play-network\"></ha-icon>\
                         <div class=\"client-item-info\">\
                         <div class=\"client-item-name\">{}</div>\
                         <div class=\"client-item-details\">{} {}</div>\
                         </div></div>",
                        esc(&c.client_id),
                        esc(&c.name),
                        esc(&c.product),
                        esc(&c.version)
                    )
                })
                .collect(),
        };

        format!(
            "<div class=\"client-modal{hidden}\"><div class=\"client-modal-content\">\
             <div class=\"client-modal-header\"><div class=\"client-modal-title\">Select Client</div>\
             <ha-icon class=\"client-modal-close\" icon=\"mdi:close\"></ha-icon></div>\
             <div class=\"client-list\">{list}</div></div></div>"
        )
    }
}
