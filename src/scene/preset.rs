//! Scene preset loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable preset files.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};

use super::{ColorMode, DeformMode};

/// Everything the demo controls expose, capture-able to disk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenePreset {
    /// Rotation about x, degrees
    pub pitch: f32,
    /// Rotation about y, degrees
    pub yaw: f32,
    /// Rotation about z, degrees
    pub roll: f32,
    /// Light power exponent; effective power is 2^exp
    pub light_power_exp: f32,
    /// Specular exponent
    pub shininess: f32,
    pub deform: DeformMode,
    pub color: ColorMode,
}

impl Default for ScenePreset {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            light_power_exp: 7.0,
            shininess: 4.0,
            deform: DeformMode::Sin,
            color: ColorMode::Grass,
        }
    }
}

/// Error type for preset loading
#[derive(Debug)]
pub enum PresetError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
}

impl From<std::io::Error> for PresetError {
    fn from(e: std::io::Error) -> Self {
        PresetError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for PresetError {
    fn from(e: ron::error::SpannedError) -> Self {
        PresetError::ParseError(e)
    }
}

impl From<ron::Error> for PresetError {
    fn from(e: ron::Error) -> Self {
        PresetError::SerializeError(e)
    }
}

impl std::fmt::Display for PresetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetError::IoError(e) => write!(f, "IO error: {}", e),
            PresetError::ParseError(e) => write!(f, "Parse error: {}", e),
            PresetError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for PresetError {}

/// Load a preset from a RON file
pub fn load_preset<P: AsRef<Path>>(path: P) -> Result<ScenePreset, PresetError> {
    let contents = fs::read_to_string(path)?;
    Ok(ron::from_str(&contents)?)
}

/// Save a preset to a RON file
pub fn save_preset<P: AsRef<Path>>(preset: &ScenePreset, path: P) -> Result<(), PresetError> {
    let config = ron::ser::PrettyConfig::new().indentor("  ".to_string());
    let contents = ron::ser::to_string_pretty(preset, config)?;
    fs::write(path, contents)?;
    Ok(())
}
