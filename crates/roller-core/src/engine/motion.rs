//! Mutable physical quantities and the optional page table.

use crate::config::{validate_pages, Page};

/// Active upper/lower bound pair
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub upper: f64,
    pub lower: f64,
}

impl Bounds {
    pub fn new(upper: f64, lower: f64) -> Self {
        Self { upper, lower }
    }

    /// `lower > upper` is a configuration fault, reported but never corrected
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.lower > self.upper
    }
}

impl From<&Page> for Bounds {
    fn from(page: &Page) -> Self {
        Self::new(page.upper(), page.lower())
    }
}

/// Motion state of a single scrollable surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotionState {
    /// Displayed offset
    pub position: f64,
    /// Offset one tick ago, source of release momentum
    pub previous_position: f64,
    /// Offset the displayed position eases toward
    pub target: f64,
    /// Position captured when the drag started
    pub drag_anchor: f64,
    /// Signed per-tick velocity
    pub momentum: f64,
    pub dragging: bool,
    pub enabled: bool,
}

impl MotionState {
    /// Nothing left to integrate or ease
    pub fn is_settled(&self) -> bool {
        !self.dragging && self.momentum == 0.0 && self.target == self.position
    }

    pub(crate) fn zero(&mut self) {
        self.position = 0.0;
        self.target = 0.0;
        self.drag_anchor = 0.0;
        self.previous_position = 0.0;
        self.momentum = 0.0;
    }
}

/// Page table plus current/previous page index.
///
/// Invariant: `current < pages.len()` and `pages` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Paging {
    pages: Vec<Page>,
    pub(crate) current: usize,
    pub(crate) previous: usize,
}

impl Paging {
    pub(crate) fn new(pages: Vec<Page>, current: usize) -> crate::Result<Self> {
        validate_pages(&pages)?;
        if current >= pages.len() {
            return Err(crate::Error::PageOutOfRange {
                page: current,
                len: pages.len(),
            });
        }
        Ok(Self {
            pages,
            current,
            previous: current,
        })
    }

    /// Swap the page table, clamping the indices into it
    pub(crate) fn replace(&mut self, pages: Vec<Page>) -> crate::Result<()> {
        validate_pages(&pages)?;
        let last = pages.len() - 1;
        self.pages = pages;
        self.current = self.current.min(last);
        self.previous = self.previous.min(last);
        Ok(())
    }

    pub(crate) fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub(crate) fn len(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn last_index(&self) -> usize {
        self.pages.len() - 1
    }

    pub(crate) fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Bounds of the current page, missing bounds resolved to 0
    pub(crate) fn bounds(&self) -> Bounds {
        Bounds::from(&self.pages[self.current])
    }
}
