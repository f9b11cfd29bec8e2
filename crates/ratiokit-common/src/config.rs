//! Configuration for the aspect-ratio polyfill.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields a working setup:
//!
//! ```json
//! {
//!   "polyfill": { "attribute": "aspect-ratio", "clamp_width_to_max_height": false },
//!   "log": { "default_directive": "info", "json": false }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CommonError, Result};

/// Attribute the polyfill watches unless configured otherwise.
pub const DEFAULT_ATTRIBUTE: &str = "aspect-ratio";

/// Which kinds of tree mutation wake the polyfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserveOptions {
    pub attributes: bool,
    pub child_list: bool,
    pub character_data: bool,
    pub subtree: bool,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            attributes: true,
            child_list: true,
            character_data: true,
            subtree: true,
        }
    }
}

/// Polyfill behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolyfillConfig {
    /// Attribute carrying the `"W/H"` declaration.
    pub attribute: String,

    /// Bound the derived width by `max-height` instead of `max-width` when
    /// height governs. Off by default; only useful to match pages tuned
    /// against the older polyfill.
    pub clamp_width_to_max_height: bool,

    /// Mutation kinds to subscribe to.
    pub observe: ObserveOptions,

    /// Whether resize and ready-state signals rescan the tree. When false
    /// they only re-apply the elements already tracked.
    pub reconcile_on_resize: bool,
}

impl Default for PolyfillConfig {
    fn default() -> Self {
        Self {
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            clamp_width_to_max_height: false,
            observe: ObserveOptions::default(),
            reconcile_on_resize: true,
        }
    }
}

impl PolyfillConfig {
    /// Check the values serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if self.attribute.is_empty() {
            return Err(CommonError::Invalid("attribute name is empty".into()));
        }
        if self
            .attribute
            .chars()
            .any(|c| c.is_whitespace() || c == '/')
        {
            return Err(CommonError::Invalid(format!(
                "attribute name {:?} contains whitespace or '/'",
                self.attribute
            )));
        }
        Ok(())
    }
}

/// Logging setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when the environment does not provide one.
    pub default_directive: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_directive: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioKitConfig {
    pub polyfill: PolyfillConfig,
    pub log: LogConfig,
}

impl RatioKitConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.polyfill.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading RatioKit config");
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
