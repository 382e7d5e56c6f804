//! # Scroll Tracker
//!
//! Keeps the two most recent vertical offsets of a viewport so layout code
//! can tell which way the user is scrolling. The output pane feeds it on
//! every scroll notification; the header reads it to decide whether to
//! collapse or draw its separator.

/// Current and previous vertical offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub current: u16,
    pub previous: u16,
}

impl ScrollState {
    pub fn scrolled_down(&self) -> bool {
        self.current > self.previous
    }

    pub fn scrolled_up(&self) -> bool {
        self.current < self.previous
    }

    /// Past the threshold the header casts a separator, like a sticky bar
    /// with a shadow.
    pub fn raised(&self, threshold: u16) -> bool {
        self.current > threshold
    }

    /// A header hides while the user scrolls down past `threshold` and comes
    /// back as soon as they scroll up.
    pub fn header_visible(&self, threshold: u16) -> bool {
        self.current <= threshold || !self.scrolled_down()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrollTracker {
    state: ScrollState,
}

impl ScrollTracker {
    /// Starts tracking with one initial sample, as if a notification had
    /// fired right after subscribing.
    pub fn subscribe(initial: u16) -> Self {
        let mut tracker = Self::default();
        tracker.observe(initial);
        tracker
    }

    /// Records a scroll notification and returns the new state.
    pub fn observe(&mut self, offset: u16) -> ScrollState {
        self.state = ScrollState {
            current: offset,
            previous: self.state.current,
        };
        self.state
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_takes_initial_sample() {
        let tracker = ScrollTracker::subscribe(7);
        assert_eq!(tracker.state(), ScrollState { current: 7, previous: 0 });
    }

    #[test]
    fn test_observe_shifts_current_into_previous() {
        let mut tracker = ScrollTracker::subscribe(40);
        let state = tracker.observe(120);
        assert_eq!(state, ScrollState { current: 120, previous: 40 });
        assert!(state.scrolled_down());
    }

    #[test]
    fn test_only_last_two_samples_matter() {
        let mut tracker = ScrollTracker::default();
        for offset in [5, 90, 30, 12] {
            tracker.observe(offset);
        }
        assert_eq!(tracker.state(), ScrollState { current: 12, previous: 30 });
        assert!(tracker.state().scrolled_up());
    }

    #[test]
    fn test_header_hides_on_scroll_down_past_threshold() {
        let mut tracker = ScrollTracker::subscribe(0);

        assert!(tracker.observe(5).header_visible(10));
        assert!(!tracker.observe(20).header_visible(10));
        assert!(tracker.observe(15).header_visible(10));
    }

    #[test]
    fn test_raised_past_threshold() {
        let state = ScrollState { current: 11, previous: 11 };
        assert!(state.raised(10));
        assert!(!ScrollState::default().raised(10));
        assert!(state.header_visible(10), "no movement keeps the header");
    }
}
