//! RON description of the sounds a session registers at startup.

use crate::{AudioError, SoundId, DEFAULT_FADE_OUT_SPEED};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A one-shot effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectEntry {
    pub id: SoundId,
    pub path: PathBuf,
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Clips substituted at random on every play. `Some(vec![])` is a
    /// misconfigured group: plays are refused with a warning.
    #[serde(default)]
    pub variants: Option<Vec<PathBuf>>,
}

/// A looping channel (engine hum, afterburner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopEntry {
    pub id: SoundId,
    pub path: PathBuf,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioManifest {
    #[serde(default = "default_fade_out_speed")]
    pub fade_out_speed: f32,
    #[serde(default)]
    pub effects: Vec<EffectEntry>,
    #[serde(default)]
    pub loops: Vec<LoopEntry>,
}

fn default_volume() -> f32 {
    1.0
}
fn default_fade_out_speed() -> f32 {
    DEFAULT_FADE_OUT_SPEED
}

impl Default for AudioManifest {
    fn default() -> Self {
        Self {
            fade_out_speed: default_fade_out_speed(),
            effects: Vec::new(),
            loops: Vec::new(),
        }
    }
}

impl AudioManifest {
    pub fn from_ron(data: &str) -> Result<Self, AudioError> {
        Ok(ron::from_str(data)?)
    }

    pub fn load(path: &Path) -> Result<Self, AudioError> {
        let data = std::fs::read_to_string(path).map_err(|source| AudioError::ManifestIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&data)
    }
}
