//! Runtime Settings & Environment
//!
//! [`RuntimeSettings`] selects what a session does at start-up and where
//! collections live. [`Environment`] describes the machine the application is
//! currently running on; its [`Environment::current_key`] is the key every
//! lookup is made with.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gfxstate_runtime::{RuntimeSettings, TraceMode};
//!
//! // Default: trace into SharedAssets/GraphicsStateCollections
//! let settings = RuntimeSettings::default();
//!
//! // Shipping build: warm up from the same folder
//! let settings = RuntimeSettings {
//!     mode: TraceMode::WarmUp,
//!     ..Default::default()
//! };
//!
//! // Or from a JSON config file
//! let settings = RuntimeSettings::from_json_file("gfxstate.json")?;
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use gfxstate_core::errors::Result;
use gfxstate_core::{GraphicsDeviceType, PlatformKey, RuntimePlatform};

/// Default folder (relative to the project root) holding collection files.
pub const DEFAULT_COLLECTION_FOLDER: &str = "SharedAssets/GraphicsStateCollections";

/// Default file-name prefix of newly traced collections.
pub const DEFAULT_OUTPUT_PREFIX: &str = "GfxState";

/// What a session does with the matching collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TraceMode {
    /// Record every variant/state the application renders.
    #[default]
    Tracing,
    /// Pre-compile the stored states of the matching collection.
    WarmUp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub mode: TraceMode,
    pub collection_folder: PathBuf,
    pub output_prefix: String,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            mode: TraceMode::default(),
            collection_folder: PathBuf::from(DEFAULT_COLLECTION_FOLDER),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
        }
    }
}

impl RuntimeSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

/// The environment the application is running in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub platform: RuntimePlatform,
    pub device: GraphicsDeviceType,
    pub quality_levels: Vec<String>,
    pub quality_index: usize,
    /// Name of the active scene, used in log messages only.
    pub scene_name: String,
}

impl Environment {
    #[must_use]
    pub fn new(platform: RuntimePlatform, device: GraphicsDeviceType, quality: &str) -> Self {
        Self {
            platform,
            device,
            quality_levels: vec![quality.to_string()],
            quality_index: 0,
            scene_name: String::new(),
        }
    }

    #[must_use]
    pub fn with_scene(mut self, scene_name: impl Into<String>) -> Self {
        self.scene_name = scene_name.into();
        self
    }

    /// Name of the active quality level (empty if the index is out of range).
    #[must_use]
    pub fn quality_level_name(&self) -> &str {
        self.quality_levels
            .get(self.quality_index)
            .map_or("", String::as_str)
    }

    #[must_use]
    pub fn current_key(&self) -> PlatformKey {
        PlatformKey::new(self.platform, self.device, self.quality_level_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = RuntimeSettings::from_json_str(r#"{ "mode": "WarmUp" }"#).unwrap();
        assert_eq!(settings.mode, TraceMode::WarmUp);
        assert_eq!(settings.collection_folder, PathBuf::from(DEFAULT_COLLECTION_FOLDER));
        assert_eq!(settings.output_prefix, DEFAULT_OUTPUT_PREFIX);
    }

    #[test]
    fn test_current_key_uses_active_quality_level() {
        let env = Environment {
            platform: RuntimePlatform::WindowsPlayer,
            device: GraphicsDeviceType::Direct3D12,
            quality_levels: vec!["Low".into(), "Medium".into(), "High".into()],
            quality_index: 2,
            scene_name: "Garden".into(),
        };
        assert_eq!(env.current_key().quality_level_name, "High");

        let out_of_range = Environment {
            quality_index: 9,
            ..env
        };
        assert_eq!(out_of_range.quality_level_name(), "");
    }
}
