/// Runner settings loaded from a TOML file
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use vtxform_core::{ApplyConfig, TransformSpec};

/// All runner settings. Every table is optional.
///
/// ```toml
/// [grid]
/// nx = 12
/// ny = 12
/// spacing = 0.5
///
/// [apply]
/// parallel_threshold = 1024
///
/// [transform]
/// kind = "scale"
/// factors = [1.0, 1.0, 2.5]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub grid: GridSettings,
    pub apply: ApplyConfig,
    pub transform: Option<TransformSpec>,
}

/// Dimensions of the generated quad grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Vertices along x
    pub nx: usize,
    /// Vertices along y
    pub ny: usize,
    pub spacing: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        // 144 vertices / 121 quads, the size of the reference vertex and quad tables
        Self {
            nx: 12,
            ny: 12,
            spacing: 1.0,
        }
    }
}

impl RunSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse runner settings")
    }

    /// Load settings from `path`; a missing or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = Self::from_toml_str(&content)?;
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }
}
