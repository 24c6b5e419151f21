//! Gesture handlers: translate drag deltas into a target position.

use serde::{Deserialize, Serialize};

use super::Roller;
use crate::events::RollerEvent;

/// Minimum drag distance before the `up`/`down` hooks fire
pub const DRAG_DEADZONE: f64 = 10.0;

/// A recognized gesture, as reported by the host's gesture source.
///
/// `DragMove` carries the cumulative offset since the drag started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", rename_all = "snake_case")]
pub enum GestureEvent {
    Touch,
    DragStart,
    DragMove { dx: f64, dy: f64 },
    DragEnd,
}

impl Roller {
    /// Dispatch a gesture to the matching handler
    pub fn handle(&mut self, gesture: GestureEvent) {
        match gesture {
            GestureEvent::Touch => self.touch_start(),
            GestureEvent::DragStart => self.drag_start(),
            GestureEvent::DragMove { dx, dy } => self.drag_move(dx, dy),
            GestureEvent::DragEnd => self.drag_end(),
        }
    }

    /// Fresh contact cancels any residual momentum, even while disabled
    pub fn touch_start(&mut self) {
        self.motion.momentum = 0.0;
    }

    pub fn drag_start(&mut self) {
        if !self.motion.enabled {
            return;
        }
        self.motion.dragging = true;
        self.motion.drag_anchor = self.motion.position;
    }

    /// Follow the finger, resisting travel past the active bounds
    pub fn drag_move(&mut self, dx: f64, dy: f64) {
        if !self.motion.enabled {
            return;
        }

        let delta = if self.config.horizontal { dx } else { dy };
        let bounds = self.bounds();
        let damp = 1.0 - self.config.page_switch_drag_damp;

        let motion = &mut self.motion;
        motion.target = motion.drag_anchor + delta;

        if motion.target > bounds.upper {
            motion.target += (bounds.upper - motion.target) * damp;
        } else if motion.target < bounds.lower {
            motion.target += (bounds.lower - motion.target) * damp;
        }

        if delta.abs() > DRAG_DEADZONE {
            if delta < 0.0 {
                self.emit(RollerEvent::Up);
            } else {
                self.emit(RollerEvent::Down);
            }
        }
    }

    pub fn drag_end(&mut self) {
        if !self.motion.enabled {
            return;
        }
        self.motion.dragging = false;
        self.release();
    }
}
