//! Bridge configuration.

use serde::{Deserialize, Serialize};

/// Generic configuration for the edit bridge.
///
/// Front-end crates extend this with their own options by flattening it into
/// their config type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Size in bytes of the engine's input scratch area.
    ///
    /// One byte of it is reserved for the NUL terminator, so the largest
    /// keystroke payload is `scratch_capacity - 1` bytes of UTF-8.
    pub scratch_capacity: usize,

    /// Read at most this many candidates per refresh. `None` reads all of them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_candidates: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratch_capacity: 256,
            max_candidates: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
