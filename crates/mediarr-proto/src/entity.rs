use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::item::RawItem;

/// Player states that hide the now-playing overlay.
pub const INACTIVE_PLAYER_STATES: [&str; 3] = ["unavailable", "idle", "off"];

/// One host delivery: entity id → latest snapshot.
pub type StateSnapshot = HashMap<String, EntityState>;

/// Snapshot of a single host entity (a provider sensor or a media player).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityState {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attributes {
    /// Ordered raw provider items. `null` and a missing key are both "no data".
    /// Entries that are not objects are dropped on decode.
    #[serde(default, deserialize_with = "lenient_items")]
    pub data: Option<Vec<RawItem>>,
    #[serde(default)]
    pub media_title: Option<String>,
    #[serde(default)]
    pub media_series_title: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub media_position: Option<f64>,
    /// Seconds.
    #[serde(default)]
    pub media_duration: Option<f64>,
    #[serde(default)]
    pub entity_picture: Option<String>,
    /// Everything else the host sends along.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decode `data` without letting one bad entry reject the whole delivery.
fn lenient_items<'de, D>(deserializer: D) -> Result<Option<Vec<RawItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(values)) => values
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(map) => Some(RawItem(map)),
                other => {
                    warn!("entity: dropping malformed item {}", other);
                    None
                }
            })
            .collect(),
        Some(other) => {
            warn!("entity: ignoring non-list data {}", other);
            return Ok(None);
        }
    };
    Ok(Some(items))
}

impl EntityState {
    /// Raw provider items, empty when the entity carries none.
    pub fn items(&self) -> &[RawItem] {
        self.attributes.data.as_deref().unwrap_or_default()
    }

    /// Whether a media player in this state should show the overlay.
    pub fn is_player_active(&self) -> bool {
        !INACTIVE_PLAYER_STATES.contains(&self.state.as_str())
    }
}
