//! Page navigation: end-of-drag threshold decisions and `go`.

use std::fmt;

use tracing::debug;

use super::Roller;
use crate::events::{PageChange, RollerEvent};

/// Callback fired once when the roller arrives at its target.
///
/// Receives the engine, so it may navigate again.
pub type Completion = Box<dyn FnOnce(&mut Roller)>;

/// Options for [`Roller::go_with`]
pub struct GoOptions {
    emit: bool,
    on_arrive: Option<Completion>,
}

impl Default for GoOptions {
    fn default() -> Self {
        Self {
            emit: true,
            on_arrive: None,
        }
    }
}

impl fmt::Debug for GoOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoOptions")
            .field("emit", &self.emit)
            .field("on_arrive", &self.on_arrive.is_some())
            .finish()
    }
}

impl GoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `change`/`enter`/`leave` (default true)
    pub fn with_emit(mut self, emit: bool) -> Self {
        self.emit = emit;
        self
    }

    /// Run `callback` once the transition settles
    pub fn with_callback(mut self, callback: impl FnOnce(&mut Roller) + 'static) -> Self {
        self.on_arrive = Some(Box::new(callback));
        self
    }
}

impl Roller {
    /// Navigate to `page`, emitting page events
    pub fn go(&mut self, page: usize) -> crate::Result<()> {
        self.go_with(page, GoOptions::default())
    }

    /// Navigate to `page`.
    ///
    /// Enables the engine. Going to the current page only runs the callback,
    /// synchronously. Otherwise the target becomes the new page's upper bound
    /// when moving forward or its lower bound when moving back, and the
    /// callback fires when the position settles there.
    pub fn go_with(&mut self, page: usize, options: GoOptions) -> crate::Result<()> {
        let paging = self.paging.as_ref().ok_or(crate::Error::PagingDisabled)?;
        if page >= paging.len() {
            return Err(crate::Error::PageOutOfRange {
                page,
                len: paging.len(),
            });
        }
        let current = paging.current;

        self.enable();

        if page == current {
            if let Some(callback) = options.on_arrive {
                callback(self);
            }
            return Ok(());
        }

        self.switch_page(page, options);
        Ok(())
    }

    /// Decide what a released drag does: switch page past the threshold,
    /// otherwise keep the last frame's velocity as momentum.
    pub(super) fn release(&mut self) {
        let bounds = self.bounds();
        let threshold = self.config.page_switch_threshold;
        let target = self.motion.target;

        let next = self.paging.as_ref().and_then(|paging| {
            let current = paging.current;
            if current > 0 && target > bounds.upper + threshold {
                Some(current - 1)
            } else if current < paging.last_index() && target < bounds.lower - threshold {
                Some(current + 1)
            } else {
                None
            }
        });

        match next {
            Some(page) => self.switch_page(page, GoOptions::default()),
            None => {
                self.motion.momentum = self.motion.position - self.motion.previous_position;
            }
        }
    }

    fn switch_page(&mut self, page: usize, options: GoOptions) {
        let Some(paging) = self.paging.as_mut() else {
            return;
        };
        let Some(next) = paging.page(page).copied() else {
            return;
        };

        paging.previous = paging.current;
        paging.current = page;
        let change = PageChange {
            from: paging.previous,
            to: page,
        };

        let snap = if change.to > change.from {
            next.upper()
        } else {
            next.lower()
        };
        debug!(from = change.from, to = change.to, snap, "Switching page");

        self.motion.target = snap;
        self.pending = options.on_arrive;

        if options.emit {
            self.emit(RollerEvent::Change(change));
            self.emit(RollerEvent::Enter(change));
            self.emit(RollerEvent::Leave(change));
        }
    }
}
