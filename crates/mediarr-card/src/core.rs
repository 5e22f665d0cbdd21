//! CardCore: single-owner event loop for the card.
//!
//! Owns the `Card` exclusively. HTTP handlers and timers send `CardEvent`
//! messages to this loop; client discovery and remote play run as spawned
//! tasks and report back through the same channel, so nothing ever blocks
//! the loop or touches the card from outside it.
//!
//! After each event the rendered card is published through a
//! `tokio::sync::watch` channel. Readers always see the latest render and
//! never wait on the loop.

use mediarr_proto::entity::StateSnapshot;
use mediarr_proto::source::SectionKey;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::action::Action;
use crate::card::{Card, Effect};
use crate::clients::{PlexApi, RemoteClient};

// ── CardEvent ─────────────────────────────────────────────────────────────────

/// All inputs into the CardCore loop.
#[derive(Debug)]
pub enum CardEvent {
    /// A host state delivery (one tick).
    States(StateSnapshot),
    /// A user interaction.
    Action(Action),
    /// Result of a discovery task.
    ClientsDiscovered {
        generation: u64,
        clients: Vec<RemoteClient>,
    },
    /// Result of a remote-play task.
    PlayFinished { generation: u64, success: bool },
    /// Auto-rotation timer.
    RotateTick,
    /// Shutdown requested.
    Shutdown,
}

/// What readers of the card see.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardSnapshot {
    pub html: String,
    pub selected_type: Option<SectionKey>,
    pub selected_index: usize,
}

impl CardSnapshot {
    fn of(card: &Card) -> Self {
        Self {
            html: card.render(),
            selected_type: card.selection().selected_type(),
            selected_index: card.selection().selected_index(),
        }
    }
}

// ── CardCore ──────────────────────────────────────────────────────────────────

pub struct CardCore {
    card: Card,
    /// Loop-back channel for spawned tasks and the rotation timer.
    event_tx: mpsc::Sender<CardEvent>,
    snapshot_tx: watch::Sender<CardSnapshot>,
}

impl CardCore {
    pub fn new(card: Card, event_tx: mpsc::Sender<CardEvent>) -> (Self, watch::Receiver<CardSnapshot>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(CardSnapshot::of(&card));
        (
            Self {
                card,
                event_tx,
                snapshot_tx,
            },
            snapshot_rx,
        )
    }

    /// Run the event loop until `Shutdown` arrives.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<CardEvent>) -> anyhow::Result<()> {
        info!("CardCore: starting event loop");

        if let Some(secs) = self.card.config().auto_rotate_secs {
            info!("CardCore: auto-rotate every {}s", secs);
            let rotate_tx = self.event_tx.clone();
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(tokio::time::Duration::from_secs(secs)).await;
                    if rotate_tx.send(CardEvent::RotateTick).await.is_err() {
                        break;
                    }
                }
            });
        }

        loop {
            match event_rx.recv().await {
                None => {
                    info!("CardCore: event channel closed, shutting down");
                    break;
                }
                Some(CardEvent::Shutdown) => {
                    info!("CardCore: shutdown requested");
                    break;
                }
                Some(evt) => {
                    self.handle_event(evt);
                    self.publish();
                }
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, evt: CardEvent) {
        match evt {
            CardEvent::States(states) => {
                debug!("CardCore: state delivery ({} entities)", states.len());
                self.card.set_states(&states);
            }
            CardEvent::Action(action) => {
                if let Some(effect) = self.card.apply(action) {
                    self.spawn_effect(effect);
                }
            }
            CardEvent::ClientsDiscovered {
                generation,
                clients,
            } => {
                self.card.clients_discovered(generation, clients);
            }
            CardEvent::PlayFinished {
                generation,
                success,
            } => {
                self.card.play_finished(generation, success);
            }
            CardEvent::RotateTick => {
                // Rotation pauses while the client selector is up.
                if !self.card.state().selector.is_open() {
                    self.card.advance();
                }
            }
            CardEvent::Shutdown => {}
        }
    }

    fn spawn_effect(&self, effect: Effect) {
        let tx = self.event_tx.clone();
        match effect {
            Effect::Discover { generation, server } => {
                tokio::spawn(async move {
                    let clients = PlexApi::new(server).clients().await;
                    let _ = tx
                        .send(CardEvent::ClientsDiscovered {
                            generation,
                            clients,
                        })
                        .await;
                });
            }
            Effect::Play {
                generation,
                server,
                client_id,
                item_key,
            } => {
                tokio::spawn(async move {
                    let success = PlexApi::new(server).play(&client_id, &item_key).await;
                    let _ = tx
                        .send(CardEvent::PlayFinished {
                            generation,
                            success,
                        })
                        .await;
                });
            }
        }
    }

    fn publish(&self) {
        let snapshot = CardSnapshot::of(&self.card);
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}
