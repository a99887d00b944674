//! Viewport visibility for a single row

use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

/// Shared cell the host writes intersection ratios into.
///
/// Writes through the handle do not notify anyone; the tracker picks them up on
/// its next [`VisibilityTracker::recheck`]. This models hosts whose intersection
/// callbacks can be missed while scrolling fast.
#[derive(Debug, Clone, Default)]
pub struct IntersectionHandle {
    ratio: Arc<Mutex<Option<f64>>>,
}

impl IntersectionHandle {
    pub fn record(&self, ratio: f64) {
        *self.ratio.lock().unwrap_or_else(PoisonError::into_inner) = Some(ratio);
    }

    pub fn latest(&self) -> Option<f64> {
        *self.ratio.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Tracks whether a row intersects the viewport
#[derive(Debug)]
pub struct VisibilityTracker {
    handle: IntersectionHandle,
    visible: watch::Sender<bool>,
}

impl VisibilityTracker {
    /// A tracker that reports not visible until the first observation
    pub fn new() -> Self {
        let (visible, _) = watch::channel(false);
        Self {
            handle: IntersectionHandle::default(),
            visible,
        }
    }

    /// Record an intersection event. Returns whether visibility changed.
    pub fn observe(&self, ratio: f64) -> bool {
        self.handle.record(ratio);
        self.publish()
    }

    /// Re-derive visibility from the latest observation.
    /// Returns whether visibility changed.
    pub fn recheck(&self) -> bool {
        self.publish()
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.visible.subscribe()
    }

    /// Handle for hosts that write observations without notifying
    pub fn handle(&self) -> IntersectionHandle {
        self.handle.clone()
    }

    fn publish(&self) -> bool {
        let now_visible = self.handle.latest().is_some_and(|ratio| ratio > 0.0);
        self.visible.send_if_modified(|visible| {
            if *visible == now_visible {
                return false;
            }
            *visible = now_visible;
            true
        })
    }
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Visible window of a vertically scrolling list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(offset: f64, height: f64) -> Self {
        Self { offset, height }
    }

    /// Fraction of the span `[top, top + height)` that lies inside the viewport
    pub fn intersection_ratio(&self, top: f64, height: f64) -> f64 {
        if height <= 0.0 {
            return 0.0;
        }
        let start = top.max(self.offset);
        let end = (top + height).min(self.offset + self.height);
        ((end - start) / height).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_not_visible() {
        let tracker = VisibilityTracker::new();
        assert!(!tracker.is_visible());
        assert!(!tracker.recheck());
    }

    #[test]
    fn test_observe_reports_changes_only() {
        let tracker = VisibilityTracker::new();
        assert!(tracker.observe(0.5));
        assert!(tracker.is_visible());
        assert!(!tracker.observe(1.0));
        assert!(tracker.observe(0.0));
        assert!(!tracker.is_visible());
    }

    #[test]
    fn test_recheck_picks_up_missed_event() {
        let tracker = VisibilityTracker::new();
        tracker.handle().record(0.25);
        assert!(!tracker.is_visible());

        assert!(tracker.recheck());
        assert!(tracker.is_visible());
    }

    #[test]
    fn test_viewport_intersection() {
        let viewport = Viewport::new(100.0, 200.0);
        assert_eq!(viewport.intersection_ratio(0.0, 50.0), 0.0);
        assert_eq!(viewport.intersection_ratio(150.0, 50.0), 1.0);
        assert_eq!(viewport.intersection_ratio(75.0, 50.0), 0.5);
        assert_eq!(viewport.intersection_ratio(300.0, 50.0), 0.0);
    }
}
