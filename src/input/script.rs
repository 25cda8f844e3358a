//! Recorded stroke scripts.
//!
//! A script is a JSON document listing input events in the order the host
//! would deliver them. The headless CLI replays scripts through the same
//! capture path interactive input uses.
//!
//! ```json
//! {
//!   "bounds": { "left": 0, "top": 0 },
//!   "steps": [
//!     { "phase": "down", "event": { "source": "pointer", "offset_x": 140, "offset_y": 40 } },
//!     { "phase": "move", "event": { "source": "pointer", "offset_x": 140, "offset_y": 240 } },
//!     { "phase": "up" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::events::{InputEvent, StrokePhase, SurfaceBounds};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read stroke script {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid stroke script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Step {index} ({phase:?}) needs an event")]
    MissingEvent { index: usize, phase: StrokePhase },
}

/// One entry in a [`StrokeScript`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub phase: StrokePhase,
    /// Position of the event; optional for `up` and `leave`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<InputEvent>,
}

/// An ordered list of input events plus the surface position they were
/// recorded against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeScript {
    /// Viewport position of the surface, used to resolve touch events
    #[serde(default)]
    pub bounds: SurfaceBounds,
    pub steps: Vec<ScriptStep>,
}

impl StrokeScript {
    /// Loads and validates a script file.
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let text = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let script = Self::parse(&text)?;
        log::debug!(
            "Loaded stroke script {} ({} steps)",
            path.display(),
            script.steps.len()
        );
        Ok(script)
    }

    /// Parses and validates a script from JSON text.
    ///
    /// `down` and `move` steps must carry an event.
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let script: StrokeScript = serde_json::from_str(text)?;
        if let Some((index, step)) = script.steps.iter().enumerate().find(|(_, step)| {
            matches!(step.phase, StrokePhase::Down | StrokePhase::Move) && step.event.is_none()
        }) {
            return Err(ScriptError::MissingEvent {
                index,
                phase: step.phase,
            });
        }
        Ok(script)
    }
}
