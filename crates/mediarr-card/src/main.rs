use std::path::PathBuf;

use anyhow::Context;
use mediarr_card::card::Card;
use mediarr_card::core::{CardCore, CardEvent};
use mediarr_card::http;
use mediarr_proto::config::Config;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter.as_str())
        .init();

    tracing::info!("mediarr starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    // ── CardEvent channel (HTTP/timers → CardCore) ───────────────────────────
    let (event_tx, event_rx) = mpsc::channel::<CardEvent>(256);

    // ── Build the card and its core ──────────────────────────────────────────
    let card = Card::new(config.card);
    let (card_core, snapshot_rx) = CardCore::new(card, event_tx.clone());

    // ── HTTP server ──────────────────────────────────────────────────────────
    http::start_server(
        config.http.bind_address.clone(),
        config.http.port,
        event_tx,
        snapshot_rx,
    );

    // ── Run CardCore ─────────────────────────────────────────────────────────
    card_core.run(event_rx).await?;

    Ok(())
}
