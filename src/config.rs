//! Application configuration.
//!
//! The configuration is a JSON file, by default
//! `$XDG_CONFIG_HOME/wsnav/config.json`.  Only the parts the workspace core
//! consumes are modelled: the key bindings of each input mode, which mode
//! is active, the back-and-forth behaviour and the outputs the daemon
//! brings up.
//!
//! # Example
//!
//! ```json
//! {
//!   "auto_back_and_forth": true,
//!   "mode": "default",
//!   "modes": {
//!     "default": [
//!       { "keys": "Mod4+1", "command": "workspace 1: web" },
//!       { "keys": "Mod4+Tab", "command": "workspace next" }
//!     ]
//!   },
//!   "outputs": ["DP-1", "HDMI-A-1"]
//! }
//! ```

use crate::command::Binding;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and every key
/// falls back to its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Re-selecting the focused workspace returns to the previous one.
    pub auto_back_and_forth: bool,
    /// Name of the active input mode.
    pub mode: String,
    /// Ordered bindings per input mode.
    pub modes: HashMap<String, Vec<Binding>>,
    /// Outputs to bring up at start, in display order.
    pub outputs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_back_and_forth: false,
            mode: "default".into(),
            modes: HashMap::new(),
            outputs: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Bindings of the active mode, in order.  Empty if the mode is not
    /// defined.
    pub fn bindings(&self) -> &[Binding] {
        self.modes.get(&self.mode).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
