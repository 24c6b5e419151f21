//! Scroll/paging engine
//!
//! `Roller` owns the motion state, the optional page table, the listener list
//! and the frame scheduler handle. The work is split by concern:
//!
//! - `motion` - state, bounds and page table
//! - `physics` - the per-frame integrator (`tick`)
//! - `drag` - gesture handlers
//! - `pager` - end-of-drag page decisions and programmatic navigation
//!
//! # Usage
//!
//! ```ignore
//! use roller_core::{EventKind, ManualScheduler, Roller, RollerConfig};
//!
//! let frames = ManualScheduler::new();
//! let mut roller = Roller::new(RollerConfig::default(), frames.clone())?;
//! roller.on(EventKind::Update, |e| println!("{e}"));
//! roller.enable();
//!
//! // Host refresh loop
//! while frames.take_request() {
//!     roller.frame();
//! }
//! ```

mod drag;
mod motion;
mod pager;
mod physics;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{Page, RollerConfig};
use crate::events::{EventKind, ListenerId, Listeners, RollerEvent};
use crate::scheduler::FrameScheduler;

pub use drag::{GestureEvent, DRAG_DEADZONE};
pub use motion::{Bounds, MotionState};
pub use pager::{Completion, GoOptions};

use motion::Paging;

/// Physics-driven scroll engine for one surface
pub struct Roller {
    config: Arc<RollerConfig>,
    motion: MotionState,
    /// Bounds used when no page table is configured
    global: Bounds,
    paging: Option<Paging>,
    /// Fired once when the position reaches the target
    pending: Option<Completion>,
    listeners: Listeners,
    scheduler: Box<dyn FrameScheduler>,
}

impl fmt::Debug for Roller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roller")
            .field("motion", &self.motion)
            .field("global", &self.global)
            .field("paging", &self.paging)
            .field("pending", &self.pending.is_some())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl Roller {
    /// Create a roller driven by `scheduler`.
    ///
    /// Fails fast on an unusable configuration. When `config.enabled` is set
    /// the scheduler is armed immediately.
    pub fn new(
        config: impl Into<Arc<RollerConfig>>,
        scheduler: impl FrameScheduler + 'static,
    ) -> crate::Result<Self> {
        let config = config.into();

        if let Err(e) = config.validate() {
            warn!(error = %e, "Refusing to construct roller");
            return Err(e);
        }

        let paging = config
            .pages
            .clone()
            .map(|pages| Paging::new(pages, config.current_page))
            .transpose()?;

        let mut roller = Self {
            global: Bounds::new(config.upper_bound, config.lower_bound),
            motion: MotionState::default(),
            paging,
            pending: None,
            listeners: Listeners::new(),
            scheduler: Box::new(scheduler),
            config,
        };

        if roller.config.enabled {
            roller.enable();
        }

        Ok(roller)
    }

    pub fn config(&self) -> &RollerConfig {
        &self.config
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.motion.position
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.motion.target
    }

    #[inline]
    pub fn momentum(&self) -> f64 {
        self.motion.momentum
    }

    pub fn is_dragging(&self) -> bool {
        self.motion.dragging
    }

    pub fn is_enabled(&self) -> bool {
        self.motion.enabled
    }

    /// True when the engine has nothing left to animate
    pub fn is_settled(&self) -> bool {
        self.motion.is_settled()
    }

    pub fn has_pending_callback(&self) -> bool {
        self.pending.is_some()
    }

    /// Current page index, `None` without paging
    pub fn current_page(&self) -> Option<usize> {
        self.paging.as_ref().map(|p| p.current)
    }

    /// Page left by the last transition, `None` without paging
    pub fn previous_page(&self) -> Option<usize> {
        self.paging.as_ref().map(|p| p.previous)
    }

    pub fn pages(&self) -> Option<&[Page]> {
        self.paging.as_ref().map(|p| p.pages())
    }

    /// Bounds in effect right now: the current page's, or the global pair
    pub fn bounds(&self) -> Bounds {
        self.paging
            .as_ref()
            .map(Paging::bounds)
            .unwrap_or(self.global)
    }

    /// Update the global bounds, e.g. after the host measured its content
    pub fn set_bounds(&mut self, upper: f64, lower: f64) {
        self.global = Bounds::new(upper, lower);
    }

    /// Replace or remove the page table.
    ///
    /// An empty table is rejected. The current page is clamped into a
    /// smaller table.
    pub fn set_pages(&mut self, pages: Option<Vec<Page>>) -> crate::Result<()> {
        let Some(pages) = pages else {
            self.paging = None;
            return Ok(());
        };

        match self.paging.as_mut() {
            Some(paging) => paging.replace(pages)?,
            None => {
                let current = self.config.current_page.min(pages.len().saturating_sub(1));
                self.paging = Some(Paging::new(pages, current)?);
            }
        }
        Ok(())
    }

    /// Subscribe to one event kind
    pub fn on(&mut self, kind: EventKind, callback: impl FnMut(&RollerEvent) + 'static) -> ListenerId {
        self.listeners.on(kind, callback)
    }

    /// Subscribe to every event
    pub fn on_any(&mut self, callback: impl FnMut(&RollerEvent) + 'static) -> ListenerId {
        self.listeners.on_any(callback)
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.listeners.off(id)
    }

    /// Start ticking. Idempotent.
    pub fn enable(&mut self) {
        if self.motion.enabled {
            return;
        }
        debug!("Roller enabled");
        self.motion.enabled = true;
        self.scheduler.request_frame();
    }

    /// Stop ticking; the next scheduled frame does not re-arm
    pub fn disable(&mut self) {
        if self.motion.enabled {
            debug!("Roller disabled");
        }
        self.motion.enabled = false;
    }

    /// Scheduler callback: re-arm while enabled, then run one tick
    pub fn frame(&mut self) {
        if !self.motion.enabled {
            return;
        }
        self.scheduler.request_frame();
        self.tick();
    }

    /// Zero all motion without touching the page index
    pub fn reset(&mut self) {
        self.motion.zero();
        self.emit(RollerEvent::Update { position: 0.0 });
    }

    fn emit(&mut self, event: RollerEvent) {
        self.listeners.emit(&event);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::scheduler::ManualScheduler;

    pub(crate) fn roller(config: RollerConfig) -> (Roller, ManualScheduler) {
        let frames = ManualScheduler::new();
        let roller = Roller::new(config, frames.clone()).unwrap();
        (roller, frames)
    }

    pub(crate) fn two_pages() -> RollerConfig {
        RollerConfig {
            pages: Some(vec![Page::new(0.0, -200.0), Page::new(-200.0, -400.0)]),
            ..Default::default()
        }
    }

    pub(crate) fn wide_bounds() -> RollerConfig {
        RollerConfig {
            upper_bound: 1.0e6,
            lower_bound: -1.0e6,
            ..Default::default()
        }
    }

    pub(crate) fn record(roller: &mut Roller) -> Rc<RefCell<Vec<RollerEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        roller.on_any(move |e| sink.borrow_mut().push(*e));
        events
    }

    /// Drive up to `max` scheduled frames, returning how many ran
    pub(crate) fn run_frames(roller: &mut Roller, frames: &ManualScheduler, max: usize) -> usize {
        let mut ran = 0;
        while ran < max && frames.take_request() {
            roller.frame();
            ran += 1;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::scheduler::ManualScheduler;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = RollerConfig {
            friction: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            Roller::new(config, ManualScheduler::new()),
            Err(crate::Error::Config(_))
        ));

        let empty = RollerConfig {
            pages: Some(Vec::new()),
            ..Default::default()
        };
        assert!(matches!(
            Roller::new(empty, ManualScheduler::new()),
            Err(crate::Error::EmptyPages)
        ));
    }

    #[test]
    fn test_starts_disabled_by_default() {
        let (roller, frames) = roller(RollerConfig::default());
        assert!(!roller.is_enabled());
        assert!(!frames.is_requested());
        assert_eq!(roller.current_page(), None);
    }

    #[test]
    fn test_enabled_config_arms_scheduler() {
        let (roller, frames) = roller(RollerConfig {
            enabled: true,
            ..Default::default()
        });
        assert!(roller.is_enabled());
        assert!(frames.is_requested());
    }

    #[test]
    fn test_enable_is_idempotent() {
        let (mut roller, frames) = roller(RollerConfig::default());
        roller.enable();
        roller.enable();
        assert_eq!(frames.total_requests(), 1);
    }

    #[test]
    fn test_frame_rearms_until_disabled() {
        let (mut roller, frames) = roller(RollerConfig::default());
        roller.enable();

        assert_eq!(run_frames(&mut roller, &frames, 5), 5);
        assert!(frames.is_requested());

        roller.disable();
        assert!(frames.take_request());
        roller.frame();
        assert!(!frames.is_requested());
        assert_eq!(run_frames(&mut roller, &frames, 5), 0);
    }

    #[test]
    fn test_reset_zeroes_motion_and_emits() {
        let (mut roller, _frames) = roller(two_pages());
        roller.go(1).unwrap();
        for _ in 0..10 {
            roller.tick();
        }
        roller.motion.momentum = 12.0;
        assert!(roller.position() != 0.0);

        let events = record(&mut roller);
        roller.reset();

        let motion = roller.motion();
        assert_eq!(motion.position, 0.0);
        assert_eq!(motion.target, 0.0);
        assert_eq!(motion.previous_position, 0.0);
        assert_eq!(motion.drag_anchor, 0.0);
        assert_eq!(motion.momentum, 0.0);
        assert_eq!(roller.current_page(), Some(1));
        assert_eq!(*events.borrow(), vec![RollerEvent::Update { position: 0.0 }]);
    }

    #[test]
    fn test_set_bounds_changes_active_bounds() {
        let (mut roller, _frames) = roller(RollerConfig::default());
        assert_eq!(roller.bounds(), Bounds::new(0.0, 0.0));
        roller.set_bounds(0.0, -500.0);
        assert_eq!(roller.bounds(), Bounds::new(0.0, -500.0));
    }

    #[test]
    fn test_set_pages() {
        let (mut roller, _frames) = roller(RollerConfig::default());

        assert!(matches!(
            roller.set_pages(Some(Vec::new())),
            Err(crate::Error::EmptyPages)
        ));
        assert_eq!(roller.current_page(), None);

        roller
            .set_pages(Some(vec![Page::new(0.0, -100.0), Page::new(-100.0, -200.0)]))
            .unwrap();
        assert_eq!(roller.current_page(), Some(0));
        roller.go(1).unwrap();

        roller.set_pages(Some(vec![Page::new(0.0, -50.0)])).unwrap();
        assert_eq!(roller.current_page(), Some(0));
        assert_eq!(roller.bounds(), Bounds::new(0.0, -50.0));

        roller.set_pages(None).unwrap();
        assert_eq!(roller.pages(), None);
        assert_eq!(roller.bounds(), Bounds::new(0.0, 0.0));
    }

    #[test]
    fn test_listener_removal() {
        let (mut roller, _frames) = roller(RollerConfig::default());
        let count = std::rc::Rc::new(std::cell::Cell::new(0));
        let c = count.clone();
        let id = roller.on(EventKind::Update, move |_| c.set(c.get() + 1));

        roller.reset();
        assert!(roller.off(id));
        roller.reset();

        assert_eq!(count.get(), 1);
    }
}
