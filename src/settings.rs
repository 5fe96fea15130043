//! Loader Settings
//!
//! [`LoaderOptions`] gathers everything the caller decides before a scene is
//! turned into a [`LoaderContext`](crate::loader::LoaderContext): the device
//! target, sampling density, tracer mode and optional overrides for the
//! camera and technique picked from the scene.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tracegen::settings::LoaderOptions;
//!
//! let options = LoaderOptions {
//!     samples_per_iteration: 16,
//!     ..Default::default()
//! };
//!
//! // Or from a JSON configuration file
//! let options = LoaderOptions::from_json(r#"{ "samples_per_iteration": 16 }"#)?;
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::target::Target;

/// Default number of samples emitted per rendering iteration.
pub const DEFAULT_SAMPLES_PER_ITERATION: usize = 4;

/// Film size assumed while loading, before the renderer knows the real one.
pub const DEFAULT_FILM_WIDTH: usize = 800;
pub const DEFAULT_FILM_HEIGHT: usize = 600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Path of the scene file; relative asset paths resolve against its parent.
    pub file_path: PathBuf,
    pub target: Target,
    /// Pad scene buffers to the device's preferred stride.
    pub enable_padding: bool,
    /// Must be between 1 and `i32::MAX`, checked when the context is built.
    pub samples_per_iteration: usize,
    /// Source primary rays from a precomputed list instead of a camera.
    pub is_tracer: bool,
    /// Overrides the camera type declared in the scene.
    pub camera_type: Option<String>,
    /// Overrides the technique type declared in the scene.
    pub technique_type: Option<String>,
    pub film_width: usize,
    pub film_height: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            file_path: PathBuf::new(),
            target: Target::default(),
            enable_padding: false,
            samples_per_iteration: DEFAULT_SAMPLES_PER_ITERATION,
            is_tracer: false,
            camera_type: None,
            technique_type: None,
            film_width: DEFAULT_FILM_WIDTH,
            film_height: DEFAULT_FILM_HEIGHT,
        }
    }
}

impl LoaderOptions {
    /// Parses options from JSON. Missing keys keep their defaults.
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TargetArchitecture;

    #[test]
    fn test_defaults() {
        let options = LoaderOptions::default();
        assert_eq!(options.samples_per_iteration, DEFAULT_SAMPLES_PER_ITERATION);
        assert_eq!((options.film_width, options.film_height), (800, 600));
        assert!(!options.is_tracer);
    }

    #[test]
    fn test_from_json_overrides() {
        let options = LoaderOptions::from_json(
            r#"{
                "samples_per_iteration": 16,
                "is_tracer": true,
                "technique_type": "ao",
                "target": { "architecture": "nvidia", "device": 1 }
            }"#,
        )
        .unwrap();

        assert_eq!(options.samples_per_iteration, 16);
        assert!(options.is_tracer);
        assert_eq!(options.technique_type.as_deref(), Some("ao"));
        assert_eq!(options.target.architecture, TargetArchitecture::Nvidia);
        assert_eq!(options.target.device, 1);
        assert_eq!(options.film_width, DEFAULT_FILM_WIDTH);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(LoaderOptions::from_json("{ not json").is_err());
    }
}
