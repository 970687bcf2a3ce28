//! Workflow configuration model.
//!
//! `DesignConfig` holds the catalog of room types and themes offered to
//! users, the space-budget cap, the sanity bounds applied to dimension
//! estimates, and session lifecycle settings. Defaults reproduce the
//! production catalog so an absent config file still yields a usable engine.

use serde::{Deserialize, Serialize};

/// Default cap on the share of floor area furniture may occupy.
pub const DEFAULT_MAX_ROOM_USAGE_PERCENT: f64 = 60.0;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ThemeConfig {
    /// Upper-case theme name, e.g. `MODERN LIVING`
    pub name: String,
    /// Preferred retailer domains, in priority order
    pub websites: Vec<String>,
}

/// Upper bounds (in feet) accepted from a dimension estimate.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct EstimateBounds {
    pub max_width: f64,
    pub max_depth: f64,
    pub max_height: f64,
}

impl Default for EstimateBounds {
    fn default() -> Self {
        Self {
            max_width: 20.0,
            max_depth: 20.0,
            max_height: 10.0,
        }
    }
}

/// Settings for the chat-completion backed dimension estimator.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    #[serde(default = "default_estimator_model")]
    pub model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            model: default_estimator_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_estimator_model() -> String {
    "gpt-4o".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DesignConfig {
    #[serde(default = "default_max_room_usage_percent")]
    pub max_room_usage_percent: f64,
    /// Idle time after which a session may be purged. `None` keeps sessions
    /// until they are ended explicitly.
    #[serde(default)]
    pub session_ttl_secs: Option<u64>,
    /// Where the product feed is fetched from at startup.
    #[serde(default)]
    pub product_feed_url: Option<String>,
    #[serde(default = "default_room_types")]
    pub room_types: Vec<String>,
    // Tables last so the TOML output stays valid.
    #[serde(default)]
    pub estimate_bounds: EstimateBounds,
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(rename = "theme", default = "default_themes")]
    pub themes: Vec<ThemeConfig>,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            room_types: default_room_types(),
            themes: default_themes(),
            max_room_usage_percent: DEFAULT_MAX_ROOM_USAGE_PERCENT,
            estimate_bounds: EstimateBounds::default(),
            session_ttl_secs: None,
            product_feed_url: None,
            estimator: EstimatorConfig::default(),
        }
    }
}

impl DesignConfig {
    pub fn is_room_type(&self, room_type: &str) -> bool {
        self.room_types.iter().any(|t| t == room_type)
    }

    /// Looks up a theme by name. Callers normalize case beforehand.
    pub fn theme(&self, name: &str) -> Option<&ThemeConfig> {
        self.themes.iter().find(|t| t.name == name)
    }

    pub fn theme_names(&self) -> Vec<String> {
        self.themes.iter().map(|t| t.name.clone()).collect()
    }
}

fn default_max_room_usage_percent() -> f64 {
    DEFAULT_MAX_ROOM_USAGE_PERCENT
}

fn default_room_types() -> Vec<String> {
    [
        "Living Room Furniture",
        "Bedroom Furniture",
        "Dining Room Furniture",
        "Kitchen",
        "Home Office Furniture",
        "Balcony Furniture",
        "Kids Room Furniture",
        "Study Room",
        "Guest Bedroom",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn theme(name: &str, websites: &[&str]) -> ThemeConfig {
    ThemeConfig {
        name: name.to_string(),
        websites: websites.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_themes() -> Vec<ThemeConfig> {
    vec![
        theme(
            "MINIMAL SCANDINAVIAN",
            &[
                "ethnicraft.com",
                "kavehome.com",
                "nordicnest.com",
                "nordicknots.com",
                "swyfthome.com",
                "boconcept.com",
                "zarahome.com",
                "fermliving.com",
                "heals.com",
            ],
        ),
        theme(
            "TIMELESS LUXURY",
            &[
                "rh.com",
                "nordicknots.com",
                "eichholtz.com",
                "loaf.com",
                "portaromana.com",
                "cultfurniture.com",
                "dusk.com",
                "oka.com",
                "kavehome.com",
            ],
        ),
        theme(
            "MODERN LIVING",
            &[
                "liangandeimil.com",
                "eichholtz.com",
                "gillmorespace.com",
                "nordicknots.com",
                "cultfurniture.com",
                "sohohome.com",
                "swooneditions.com",
                "heals.com",
                "ligne-roset.com",
                "loopandtwist.com",
                "kavehome.com",
            ],
        ),
        theme(
            "MODERN MEDITERRANEAN",
            &[
                "zarahome.com",
                "loopandtwist.com",
                "swyfthome.com",
                "nordicknots.com",
                "kavehome.com",
            ],
        ),
        theme(
            "BOHO ECLECTIC",
            &[
                "sklum.com",
                "loopandtwist.com",
                "dusk.com",
                "cultfurniture.com",
                "heals.com",
                "kavehome.com",
                "perchandparrow.com",
            ],
        ),
    ]
}
