//! Page Configuration
//!
//! Read once at start-up from `window.realEstateConfig`, or from a
//! `<script type="application/json" id="realestate-config">` block.
//! Missing sections fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::HoverConfig;

/// Global JS object checked first
pub const CONFIG_GLOBAL: &str = "realEstateConfig";
/// Id of the JSON script block checked second
pub const CONFIG_SCRIPT_ID: &str = "realestate-config";

/// How a saved slider value is confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveIndicator {
    /// Flash the row containing the slider
    #[default]
    Flash,
    /// Show the `update_<id>` badge, then fade it out
    Badge,
}

/// Slider updater settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Delay between a successful save and its confirmation
    pub save_delay_ms: u32,
    pub indicator: SaveIndicator,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            save_delay_ms: 1500,
            indicator: SaveIndicator::Flash,
        }
    }
}

/// Login form settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// Name of the email input inside `#login-form`
    pub email_field: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            email_field: "username".to_string(),
        }
    }
}

/// Everything the page enhancements can be tuned with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Record endpoint; `None` means the current page path
    pub endpoint: Option<String>,
    pub login_url: String,
    /// Id of the element the alert banner is mounted into; `body` if absent
    pub banner_host: String,
    /// `error`, `warn`, `info`, `debug` or `trace`
    pub log_level: String,
    pub hover: HoverConfig,
    pub slider: SliderConfig,
    pub login: LoginConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            login_url: "/login-handler/".to_string(),
            banner_host: "alerts".to_string(),
            log_level: "info".to_string(),
            hover: HoverConfig::default(),
            slider: SliderConfig::default(),
            login: LoginConfig::default(),
        }
    }
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn level(&self) -> log::Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "error" => log::Level::Error,
            "warn" | "warning" => log::Level::Warn,
            "debug" => log::Level::Debug,
            "trace" => log::Level::Trace,
            _ => log::Level::Info,
        }
    }

    /// Load from the page, falling back to defaults.
    ///
    /// Returns the config and, if a source was present but invalid, the
    /// error to report once logging is up.
    pub fn load() -> (Self, Option<ConfigError>) {
        match Self::from_global().or_else(Self::from_script) {
            Some(Ok(config)) => (config, None),
            Some(Err(err)) => (Self::default(), Some(err)),
            None => (Self::default(), None),
        }
    }

    fn from_global() -> Option<Result<Self, ConfigError>> {
        let win = web_sys::window()?;
        let value = js_sys::Reflect::get(&win, &CONFIG_GLOBAL.into()).ok()?;
        if value.is_undefined() || value.is_null() {
            return None;
        }
        Some(serde_wasm_bindgen::from_value(value).map_err(|e| ConfigError::Object(e.to_string())))
    }

    fn from_script() -> Option<Result<Self, ConfigError>> {
        let doc = web_sys::window()?.document()?;
        let text = doc.get_element_by_id(CONFIG_SCRIPT_ID)?.text_content()?;
        Some(Self::from_json(&text))
    }
}
