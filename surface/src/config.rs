//! Input-surface configuration that extends the bridge `Config` from core.
//!
//! This configuration includes:
//! - All bridge options from `jaime_core::Config` (flattened via serde)
//! - Which keys accept the engine's best candidate
//!
//! # Example
//!
//! ```rust
//! use jaime_surface::SurfaceConfig;
//!
//! let config = SurfaceConfig::from_toml_str("commit_on_space = true").unwrap();
//! assert!(config.commit_on_enter);
//! assert_eq!(config.base.scratch_capacity, 256);
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Bridge configuration (scratch capacity, candidate limit)
    #[serde(flatten)]
    pub base: jaime_core::Config,

    /// Enter accepts the best candidate while candidates are pending
    pub commit_on_enter: bool,

    /// Space accepts the best candidate while candidates are pending,
    /// instead of being sent to the engine as input
    pub commit_on_space: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            base: jaime_core::Config::default(),
            commit_on_enter: true,
            commit_on_space: false,
        }
    }
}

impl SurfaceConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_fields_are_flattened() {
        let config = SurfaceConfig::from_toml_str(
            "scratch_capacity = 32\nmax_candidates = 4\ncommit_on_enter = false\n",
        )
        .unwrap();
        assert_eq!(config.base.scratch_capacity, 32);
        assert_eq!(config.base.max_candidates, Some(4));
        assert!(!config.commit_on_enter);
        assert!(!config.commit_on_space);
    }

    #[test]
    fn round_trips_through_toml_string() {
        let config = SurfaceConfig {
            commit_on_space: true,
            ..SurfaceConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(SurfaceConfig::from_toml_str(&text).unwrap(), config);
    }
}
