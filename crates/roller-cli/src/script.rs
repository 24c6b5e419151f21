//! Gesture scripts: a recorded or hand-written stream of gestures and
//! navigation commands to replay against the engine.
//!
//! ```toml
//! [roller]
//! page_switch_threshold = 40.0
//!
//! [[roller.pages]]
//! upper_bound = 0.0
//! lower_bound = -200.0
//!
//! [[step]]
//! action = "enable"
//!
//! [[step]]
//! action = "drag_move"
//! dy = -400.0
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use roller_core::{GestureEvent, RollerConfig};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    /// Overrides the engine section of the loaded configuration
    #[serde(default)]
    pub roller: Option<RollerConfig>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Touch,
    DragStart,
    DragMove {
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
    DragEnd,
    /// Run a fixed number of frames
    Frames { count: usize },
    /// Run frames until motion settles
    Settle {
        #[serde(default)]
        max_frames: Option<usize>,
    },
    Go {
        page: usize,
        #[serde(default = "default_true")]
        emit: bool,
    },
    Bounds { upper: f64, lower: f64 },
    Reset,
    Enable,
    Disable,
}

fn default_true() -> bool {
    true
}

impl Step {
    /// The gesture this step replays, if it is one
    pub fn gesture(&self) -> Option<GestureEvent> {
        match *self {
            Step::Touch => Some(GestureEvent::Touch),
            Step::DragStart => Some(GestureEvent::DragStart),
            Step::DragMove { dx, dy } => Some(GestureEvent::DragMove { dx, dy }),
            Step::DragEnd => Some(GestureEvent::DragEnd),
            _ => None,
        }
    }
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let script: Self = toml::from_str(content)?;
        if let Some(roller) = &script.roller {
            roller.validate()?;
        }
        Ok(script)
    }
}
