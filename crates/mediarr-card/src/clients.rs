//! Plex client discovery and remote play.

use mediarr_proto::config::PlexServer;
use quick_xml::{events::Event, Reader};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// A playback-capable endpoint reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteClient {
    pub name: String,
    pub product: String,
    pub version: String,
    /// `machineIdentifier`; the target of remote-play commands.
    pub client_id: String,
}

/// Parse the `/clients` document. Every `Server` element with a
/// `machineIdentifier` becomes one client.
pub fn parse_clients(xml: &str) -> Result<Vec<RemoteClient>, DiscoveryError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut clients = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"Server" => {
                let mut client = RemoteClient {
                    name: String::new(),
                    product: String::new(),
                    version: String::new(),
                    client_id: String::new(),
                };
                for attr in e.attributes() {
                    let attr = attr.map_err(quick_xml::Error::from)?;
                    let value = attr
                        .decode_and_unescape_value(reader.decoder())?
                        .into_owned();
                    match attr.key.as_ref() {
                        b"name" => client.name = value,
                        b"product" => client.product = value,
                        b"version" => client.version = value,
                        b"machineIdentifier" => client.client_id = value,
                        _ => {}
                    }
                }
                if client.client_id.is_empty() {
                    debug!("clients: skipping Server without machineIdentifier");
                    continue;
                }
                clients.push(client);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(clients)
}

/// Library path for remote play; bare rating keys get the metadata prefix.
fn media_path(item_key: &str) -> String {
    if item_key.starts_with('/') {
        item_key.to_string()
    } else {
        format!("/library/metadata/{}", item_key)
    }
}

#[derive(Debug, Clone)]
pub struct PlexApi {
    http: reqwest::Client,
    server: PlexServer,
}

impl PlexApi {
    pub fn new(server: PlexServer) -> Self {
        Self {
            http: reqwest::Client::new(),
            server,
        }
    }

    pub async fn discover(&self) -> Result<Vec<RemoteClient>, DiscoveryError> {
        let url = format!("{}/clients", self.server.url);
        let response = self
            .http
            .get(&url)
            .query(&[("X-Plex-Token", self.server.token.as_str())])
            .header("Accept", "application/xml")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Status(response.status()));
        }

        let body = response.text().await?;
        parse_clients(&body)
    }

    /// Discovery that never fails: errors are logged and read as "no clients".
    pub async fn clients(&self) -> Vec<RemoteClient> {
        match self.discover().await {
            Ok(clients) => {
                debug!("clients: discovered {}", clients.len());
                clients
            }
            Err(e) => {
                warn!("clients: discovery failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Ask `client_id` to play `item_key`. Returns whether the server accepted it.
    pub async fn play(&self, client_id: &str, item_key: &str) -> bool {
        let url = format!("{}/player/playback/playMedia", self.server.url);
        let key = media_path(item_key);
        let result = self
            .http
            .get(&url)
            .query(&[
                ("key", key.as_str()),
                ("offset", "0"),
                ("X-Plex-Token", self.server.token.as_str()),
                ("X-Plex-Target-Client-Identifier", client_id),
            ])
            .header("X-Plex-Target-Client-Identifier", client_id)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!("clients: playing {} on {}", key, client_id);
                true
            }
            Ok(response) => {
                warn!("clients: play on {} rejected: {}", client_id, response.status());
                false
            }
            Err(e) => {
                warn!("clients: play on {} failed: {}", client_id, e);
                false
            }
        }
    }
}
