use formats::EVENT_DATA_FILE_NAME;
use layers::MarkerTheme;
use panel::GestureConfig;
use scene::MapConfig;
use serde::{Deserialize, Serialize};
use streaming::CachePolicy;

/// Page configuration. Any subset of fields may be supplied; the rest default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub map: MapConfig,
    pub markers: MarkerTheme,
    pub gestures: GestureConfig,
    /// URL of the event data document.
    pub data_url: String,
    /// Prefix joined with an item's content file name to fetch it.
    pub content_base_url: String,
    /// Share one in-flight fetch between repeated requests for the same file.
    pub dedupe_content_fetches: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            markers: MarkerTheme::default(),
            gestures: GestureConfig::default(),
            data_url: EVENT_DATA_FILE_NAME.to_string(),
            content_base_url: String::new(),
            dedupe_content_fetches: true,
        }
    }
}

impl AppConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw)
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            dedupe_in_flight: self.dedupe_content_fetches,
        }
    }

    pub fn content_url(&self, filename: &str) -> String {
        if self.content_base_url.is_empty() || self.content_base_url.ends_with('/') {
            format!("{}{}", self.content_base_url, filename)
        } else {
            format!("{}/{}", self.content_base_url, filename)
        }
    }
}
