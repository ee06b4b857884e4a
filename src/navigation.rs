//! The current-page state machine.
//!
//! A page change can come from three places: the view settling after the
//! user scrolls it, the previous/next controls, and the year/month chooser.
//! Programmatic changes tell the view to scroll, and the view then reports a
//! settle for the page it landed on.  That report is an *echo* of a change
//! the navigator already made, so it is swallowed rather than being treated
//! as a fresh user navigation.  The echo window closes when the settle
//! arrives or, failing that, when its deadline passes.
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ECHO_TIMEOUT: Duration = Duration::from_millis(500);

/// An instruction for the view to bring page `index` into view
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ScrollTo {
    pub index: usize,
    pub animated: bool,
}

/// What [`Navigator::on_view_settled()`] made of a settle event
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Settled {
    /// The event echoed a programmatic jump and was discarded
    Echo,
    /// The user moved the view to a different page, now current
    Moved(usize),
    /// The view settled on the page that was already current
    Unchanged,
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the edge of the date range")]
pub struct EdgeOfRange;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Navigator {
    index: usize,
    page_count: NonZeroUsize,
    /// Deadline of the pending echo, if any
    echo: Option<Instant>,
    echo_timeout: Duration,
}

impl Navigator {
    pub fn new(page_count: NonZeroUsize) -> Navigator {
        Navigator {
            index: 0,
            page_count,
            echo: None,
            echo_timeout: DEFAULT_ECHO_TIMEOUT,
        }
    }

    pub fn with_echo_timeout(mut self, timeout: Duration) -> Navigator {
        self.echo_timeout = timeout;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn page_count(&self) -> NonZeroUsize {
        self.page_count
    }

    pub fn is_at_start(&self) -> bool {
        self.index == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.index == self.last()
    }

    /// Whether an echo is still expected as of `now`
    pub fn echo_pending(&self, now: Instant) -> bool {
        self.echo.is_some_and(|deadline| now < deadline)
    }

    fn last(&self) -> usize {
        self.page_count.get() - 1
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.last())
    }

    /// Make page `index` (clamped into range) current and arm the echo
    /// window, replacing any echo still pending from an earlier jump
    pub fn jump_to(&mut self, index: usize, animated: bool, now: Instant) -> ScrollTo {
        let index = self.clamp(index);
        debug!(from = self.index, to = index, animated, "Jumping to page");
        self.index = index;
        self.echo = Some(now + self.echo_timeout);
        ScrollTo { index, animated }
    }

    pub fn on_view_settled(&mut self, observed: usize, now: Instant) -> Settled {
        if let Some(deadline) = self.echo.take() {
            if now < deadline {
                debug!(observed, "Discarding echo of programmatic navigation");
                return Settled::Echo;
            }
            debug!(observed, "Echo window expired; treating settle as organic");
        }
        let observed = self.clamp(observed);
        if observed == self.index {
            Settled::Unchanged
        } else {
            debug!(from = self.index, to = observed, "View settled on new page");
            self.index = observed;
            Settled::Moved(observed)
        }
    }

    /// Close an echo window whose deadline has passed.  Returns `true` if one
    /// was cleared.
    pub fn expire(&mut self, now: Instant) -> bool {
        if self.echo.is_some_and(|deadline| now >= deadline) {
            debug!("Echo never arrived; clearing");
            self.echo = None;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self, now: Instant) -> Result<ScrollTo, EdgeOfRange> {
        if self.is_at_end() {
            Err(EdgeOfRange)
        } else {
            Ok(self.jump_to(self.index + 1, true, now))
        }
    }

    pub fn prev(&mut self, now: Instant) -> Result<ScrollTo, EdgeOfRange> {
        if self.is_at_start() {
            Err(EdgeOfRange)
        } else {
            Ok(self.jump_to(self.index - 1, true, now))
        }
    }

    /// Adopt a new page count, clamping the current index into it.  Returns
    /// `true` if the index changed.
    pub fn set_page_count(&mut self, page_count: NonZeroUsize) -> bool {
        self.page_count = page_count;
        let index = self.clamp(self.index);
        let changed = index != self.index;
        if changed {
            debug!(from = self.index, to = index, "Reclamped page index");
            self.index = index;
        }
        changed
    }
}
