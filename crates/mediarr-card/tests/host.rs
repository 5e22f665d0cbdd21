use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mediarr_card::card::Card;
use mediarr_card::core::{CardCore, CardEvent, CardSnapshot};
use mediarr_card::http::router;
use serde_json::{json, Value};
use tokio::sync::{mpsc, watch};
use tower::ServiceExt;

struct Host {
    app: Router,
    snapshots: watch::Receiver<CardSnapshot>,
    events: mpsc::Sender<CardEvent>,
}

fn start(config: &str) -> Host {
    let card = Card::from_toml_str(config).unwrap();
    let (event_tx, event_rx) = mpsc::channel(64);
    let (core, snapshots) = CardCore::new(card, event_tx.clone());
    tokio::spawn(core.run(event_rx));
    Host {
        app: router(event_tx.clone(), snapshots.clone()),
        snapshots,
        events: event_tx,
    }
}

impl Host {
    async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    /// Wait until the published card satisfies `check`.
    async fn wait_for(&mut self, check: impl Fn(&CardSnapshot) -> bool) -> CardSnapshot {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if check(&self.snapshots.borrow_and_update()) {
                    return self.snapshots.borrow().clone();
                }
                self.snapshots.changed().await.unwrap();
            }
        })
        .await
        .expect("card never reached the expected state")
    }
}

fn deliveries() -> Value {
    json!({
        "sensor.plex": {
            "state": "2",
            "attributes": { "data": [
                { "title": "Alien", "key": "1", "poster": "alien.jpg" },
                { "title": "Aliens", "key": "2", "poster": "aliens.jpg" }
            ] }
        },
        "sensor.trakt": {
            "state": "1",
            "attributes": { "data": [{ "title": "Blade Runner" }] }
        }
    })
}

#[tokio::test]
async fn state_delivery_renders_the_card() {
    let mut host = start("plex_entity = \"sensor.plex\"\ntrakt_entity = \"sensor.trakt\"");

    let (status, _) = host.call("POST", "/api/states", Some(deliveries())).await;
    assert_eq!(status, StatusCode::OK);
    host.wait_for(|s| s.html.contains("Blade Runner")).await;

    let (status, body) = host.call("GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.starts_with("<ha-card>"));
    assert!(html.contains("data-type=\"plex\" data-index=\"1\""));

    let (_, body) = host.call("GET", "/api/selection", None).await;
    let selection: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(selection, json!({ "selected_type": "plex", "selected_index": 0 }));
}

#[tokio::test]
async fn malformed_items_do_not_reject_the_delivery() {
    let mut host = start("plex_entity = \"sensor.plex\"\ntrakt_entity = \"sensor.trakt\"");
    let mixed = json!({
        "sensor.plex": {
            "state": "2",
            "attributes": { "data": [{ "title": "Alien", "key": "1" }, "garbage"] }
        },
        "sensor.trakt": {
            "state": "1",
            "attributes": { "data": [{ "title": "Blade Runner" }] }
        }
    });

    let (status, _) = host.call("POST", "/api/states", Some(mixed)).await;
    assert_eq!(status, StatusCode::OK);
    let snapshot = host
        .wait_for(|s| s.html.contains("Blade Runner") && s.html.contains("Alien"))
        .await;
    assert!(!snapshot.html.contains("data-type=\"plex\" data-index=\"1\""));
}

#[tokio::test]
async fn interactions_move_the_selection() {
    let mut host = start("plex_entity = \"sensor.plex\"\ntrakt_entity = \"sensor.trakt\"");
    host.call("POST", "/api/states", Some(deliveries())).await;
    host.wait_for(|s| s.selected_type.is_some()).await;

    host.call("POST", "/api/select/trakt/9", None).await;
    let snapshot = host
        .wait_for(|s| s.selected_type.map(|k| k.as_str()) == Some("trakt"))
        .await;
    assert_eq!(snapshot.selected_index, 0);

    host.call("POST", "/api/next", None).await;
    host.wait_for(|s| s.selected_type.map(|k| k.as_str()) == Some("plex"))
        .await;

    host.call("POST", "/api/toggle/plex", None).await;
    host.wait_for(|s| s.html.contains("section-content collapsed"))
        .await;
}

#[tokio::test]
async fn unknown_section_is_not_found() {
    let host = start("plex_entity = \"sensor.plex\"");
    let (status, _) = host.call("POST", "/api/select/emby/0", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = host.call("POST", "/api/toggle/emby", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn shutdown_stops_the_loop() {
    let host = start("plex_entity = \"sensor.plex\"");
    host.events.send(CardEvent::Shutdown).await.unwrap();
    // Once the loop is gone the receiver is dropped and sends fail.
    tokio::time::timeout(Duration::from_secs(5), async {
        while host.events.send(CardEvent::RotateTick).await.is_ok() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}
