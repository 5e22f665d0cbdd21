use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One provider item exactly as delivered in `attributes.data`.
///
/// Providers disagree on field types (a year may arrive as `2024` or
/// `"2024"`, genres as a string or a list), so fields are read through
/// loose accessors instead of a fixed struct.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawItem(pub Map<String, Value>);

impl RawItem {
    /// Textual value of `field`. Numbers are stringified; empty strings,
    /// nulls and other JSON types read as absent.
    pub fn text(&self, field: &str) -> Option<String> {
        match self.0.get(field)? {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// First present field among `fields`.
    pub fn first_text(&self, fields: &[&str]) -> Option<String> {
        fields.iter().find_map(|f| self.text(f))
    }

    /// Genres as a display string. Lists are joined with `", "`.
    pub fn genres(&self) -> Option<String> {
        match self.0.get("genres")? {
            Value::Array(values) => {
                let names: Vec<&str> = values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .collect();
                (!names.is_empty()).then(|| names.join(", "))
            }
            _ => self.text("genres"),
        }
    }

    /// Runtime in minutes; zero and unparsable values read as absent.
    pub fn runtime(&self) -> Option<u32> {
        let minutes = match self.0.get("runtime")? {
            Value::Number(n) => n.as_f64().map(|f| f.round() as u32),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        }?;
        (minutes > 0).then_some(minutes)
    }

    /// True when this is the provider's "no data" marker rather than a real item.
    pub fn is_sentinel(&self) -> bool {
        match self.0.get("title_default") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<Map<String, Value>> for RawItem {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Provider-normalized item shared by every section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaItem {
    pub title: String,
    pub year: Option<String>,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub fanart: String,
    pub overview: Option<String>,
    pub genres: Option<String>,
    /// Minutes.
    pub runtime: Option<u32>,
    pub release: Option<String>,
    pub episode: Option<String>,
    pub number: Option<String>,
    /// Provider-specific item key (library key for remote play).
    pub key: Option<String>,
    /// Marks the empty-state sentinel.
    #[serde(default)]
    pub title_default: bool,
}

impl MediaItem {
    /// The sentinel with no artwork.
    pub fn empty() -> Self {
        Self {
            title_default: true,
            ..Self::default()
        }
    }

    pub fn is_empty_sentinel(&self) -> bool {
        self.title_default
    }

    /// Artwork for the background layer: fanart, falling back to the poster.
    pub fn background_art(&self) -> Option<&str> {
        [self.fanart.as_str(), self.poster.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
    }
}
