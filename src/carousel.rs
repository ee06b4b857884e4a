//! A stand-in for a horizontally paged scroll view.  Programmatic scrolls
//! either land at once or glide one page per frame; user drags move the view
//! directly.  Either way the index the view comes to rest on is reported so
//! it can be fed back to the picker as a settle event.
use datepick::navigation::ScrollTo;

/// Animated scrolls longer than this snap to within this many pages of the
/// target first
const MAX_GLIDE: usize = 6;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Carousel {
    shown: usize,
    target: Option<usize>,
    page_count: usize,
}

impl Carousel {
    pub(crate) fn new(page_count: usize) -> Carousel {
        Carousel {
            shown: 0,
            target: None,
            page_count: page_count.max(1),
        }
    }

    pub(crate) fn shown(&self) -> usize {
        self.shown
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.page_count - 1)
    }

    /// Start a scroll.  Returns the settled index if the view landed
    /// immediately.
    pub(crate) fn scroll_to(&mut self, scroll: ScrollTo) -> Option<usize> {
        let index = self.clamp(scroll.index);
        if scroll.animated && index != self.shown {
            if self.shown.abs_diff(index) > MAX_GLIDE {
                self.shown = if index > self.shown {
                    index - MAX_GLIDE
                } else {
                    index + MAX_GLIDE
                };
            }
            self.target = Some(index);
            None
        } else {
            self.shown = index;
            self.target = None;
            Some(index)
        }
    }

    /// Advance an animated scroll by one frame.  Returns the settled index
    /// when the view reaches its target.
    pub(crate) fn step(&mut self) -> Option<usize> {
        let target = self.target?;
        if self.shown < target {
            self.shown += 1;
        } else if self.shown > target {
            self.shown -= 1;
        }
        if self.shown == target {
            self.target = None;
            Some(target)
        } else {
            None
        }
    }

    /// Move the view by `delta` pages as if dragged.  Ignored mid-animation;
    /// otherwise the resting index is reported even if the drag hit an edge.
    pub(crate) fn drag(&mut self, delta: isize) -> Option<usize> {
        if self.is_animating() {
            return None;
        }
        self.shown = self.clamp(self.shown.saturating_add_signed(delta));
        Some(self.shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animated(index: usize) -> ScrollTo {
        ScrollTo {
            index,
            animated: true,
        }
    }

    #[test]
    fn test_instant_scroll_settles() {
        let mut c = Carousel::new(12);
        assert_eq!(
            c.scroll_to(ScrollTo {
                index: 7,
                animated: false
            }),
            Some(7)
        );
        assert_eq!(c.shown(), 7);
        assert!(!c.is_animating());
    }

    #[test]
    fn test_animated_scroll() {
        let mut c = Carousel::new(12);
        assert_eq!(c.scroll_to(animated(2)), None);
        assert!(c.is_animating());
        assert_eq!(c.step(), None);
        assert_eq!(c.shown(), 1);
        assert_eq!(c.step(), Some(2));
        assert!(!c.is_animating());
        assert_eq!(c.step(), None);
    }

    #[test]
    fn test_animated_scroll_to_shown_page() {
        let mut c = Carousel::new(12);
        assert_eq!(c.scroll_to(animated(0)), Some(0));
    }

    #[test]
    fn test_long_glide_snaps() {
        let mut c = Carousel::new(100);
        assert_eq!(c.scroll_to(animated(50)), None);
        assert_eq!(c.shown(), 44);
        let mut landed = None;
        while landed.is_none() {
            landed = c.step();
        }
        assert_eq!(landed, Some(50));
        c.scroll_to(animated(0));
        assert_eq!(c.shown(), 6);
    }

    #[test]
    fn test_drag() {
        let mut c = Carousel::new(3);
        assert_eq!(c.drag(-1), Some(0));
        assert_eq!(c.drag(1), Some(1));
        assert_eq!(c.drag(5), Some(2));
        c.scroll_to(animated(0));
        assert_eq!(c.drag(1), None);
        assert_eq!(c.shown(), 2);
    }
}
