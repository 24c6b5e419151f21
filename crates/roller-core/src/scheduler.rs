//! Frame scheduling seam between the engine and the host's refresh loop.
//!
//! The engine asks for the next frame through [`FrameScheduler`]; the host
//! answers by calling [`Roller::frame`](crate::Roller::frame) once per display
//! refresh. Re-arming happens only while the engine is enabled.

use std::cell::Cell;
use std::rc::Rc;

/// Something that can be asked to invoke the engine on the next frame
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Scheduler backed by a shared flag the host loop polls.
///
/// Clones share the same flag, so the host keeps one handle and gives the
/// other to the engine.
///
/// ```ignore
/// let frames = ManualScheduler::new();
/// let mut roller = Roller::new(config, frames.clone())?;
/// roller.enable();
/// while frames.take_request() {
///     roller.frame();
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    requested: Rc<Cell<bool>>,
    total: Rc<Cell<u64>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the pending request, if any
    pub fn take_request(&self) -> bool {
        self.requested.replace(false)
    }

    /// Check for a pending request without consuming it
    #[inline]
    pub fn is_requested(&self) -> bool {
        self.requested.get()
    }

    /// Number of frames requested over the scheduler's lifetime
    pub fn total_requests(&self) -> u64 {
        self.total.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.requested.set(true);
        self.total.set(self.total.get() + 1);
    }
}
