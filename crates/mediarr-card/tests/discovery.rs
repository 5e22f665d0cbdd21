use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use mediarr_card::clients::PlexApi;
use mediarr_proto::config::PlexServer;
use tokio::net::TcpListener;

const CLIENTS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MediaContainer size="2">
  <Server name="Living Room" machineIdentifier="tv-1" product="Plex for Android (TV)" version="10.1" />
  <Server name="Laptop" machineIdentifier="web-2" product="Plex Web" version="4.1" />
</MediaContainer>"#;

#[derive(Clone, Default)]
struct Recorded {
    play_calls: Arc<Mutex<Vec<(HashMap<String, String>, Option<String>)>>>,
}

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn server(url: String) -> PlexServer {
    PlexServer {
        url,
        token: "secret".into(),
    }
}

async fn clients(Query(query): Query<HashMap<String, String>>) -> Result<String, StatusCode> {
    if query.get("X-Plex-Token").map(String::as_str) != Some("secret") {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(CLIENTS_XML.to_string())
}

async fn play_media(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> StatusCode {
    let target = headers
        .get("X-Plex-Target-Client-Identifier")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    recorded.play_calls.lock().unwrap().push((query, target));
    StatusCode::OK
}

#[tokio::test]
async fn discovers_clients_from_server() {
    let url = spawn(Router::new().route("/clients", get(clients))).await;
    let api = PlexApi::new(server(url));

    let found = api.discover().await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].name, "Living Room");
    assert_eq!(found[0].client_id, "tv-1");
    assert_eq!(found[1].product, "Plex Web");
}

#[tokio::test]
async fn failing_server_yields_zero_clients() {
    let url = spawn(Router::new().route(
        "/clients",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;
    let api = PlexApi::new(server(url));
    assert!(api.discover().await.is_err());
    assert!(api.clients().await.is_empty());
}

#[tokio::test]
async fn unreachable_server_yields_zero_clients() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = PlexApi::new(server(format!("http://{}", addr)));
    assert!(api.clients().await.is_empty());
}

#[tokio::test]
async fn malformed_xml_yields_zero_clients() {
    let url = spawn(Router::new().route(
        "/clients",
        get(|| async { "<MediaContainer><Server name=\"x></MediaContainer>" }),
    ))
    .await;
    assert!(PlexApi::new(server(url)).clients().await.is_empty());
}

#[tokio::test]
async fn play_targets_the_chosen_client() {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/player/playback/playMedia", get(play_media))
        .with_state(recorded.clone());
    let url = spawn(app).await;

    let api = PlexApi::new(server(url));
    assert!(api.play("tv-1", "4242").await);

    let calls = recorded.play_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let (query, header) = &calls[0];
    assert_eq!(query["key"], "/library/metadata/4242");
    assert_eq!(query["offset"], "0");
    assert_eq!(query["X-Plex-Token"], "secret");
    assert_eq!(query["X-Plex-Target-Client-Identifier"], "tv-1");
    assert_eq!(header.as_deref(), Some("tv-1"));
}

#[tokio::test]
async fn rejected_play_reports_failure() {
    let url = spawn(Router::new().route(
        "/player/playback/playMedia",
        get(|| async { StatusCode::NOT_FOUND }),
    ))
    .await;
    assert!(!PlexApi::new(server(url)).play("tv-1", "1").await);
}
