//! Interop configuration
//!
//! Loaded from TOML alongside the rest of the runtime settings. Every field has
//! a default, so an empty document is a valid configuration:
//!
//! ```toml
//! feature_level = "11_1"
//! command_list_kind = "direct"
//! compositor_state = "GENERIC_READ"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{InteropError, Result};
use crate::states::{CommandListKind, FeatureLevel, ResourceStates};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteropConfig {
    /// Minimum feature level requested at device creation
    pub feature_level: FeatureLevel,

    /// Queue type the hand-off and copy lists are recorded for
    pub command_list_kind: CommandListKind,

    /// Native state a shared image rests in while the compositor owns it.
    /// `GENERIC_READ` suits a graphics compositor; a compute compositor may
    /// want a narrower read state. Must be read-only.
    pub compositor_state: ResourceStates,
}

impl Default for InteropConfig {
    fn default() -> Self {
        Self {
            feature_level: FeatureLevel::default(),
            command_list_kind: CommandListKind::default(),
            compositor_state: ResourceStates::GENERIC_READ,
        }
    }
}

impl InteropConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| InteropError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| InteropError::InvalidConfig(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if ResourceStates::from_bits(self.compositor_state.bits()).is_none() {
            return Err(InteropError::InvalidConfig(format!(
                "compositor_state {:#x} carries unknown state bits",
                self.compositor_state.bits()
            )));
        }
        if !self.compositor_state.is_read_only() {
            return Err(InteropError::InvalidConfig(format!(
                "compositor_state {:?} grants write access",
                self.compositor_state
            )));
        }
        Ok(())
    }
}
