//! Shared surface context.
//!
//! The gesture arbiter and the drag controller never touch each other's
//! state. Both hold a clone of the same `SurfaceContext` and communicate by
//! posting to it: the controller announces drag start/end, the arbiter
//! records touch points and asks whether the current touch was claimed.

use std::sync::{Arc, Mutex, MutexGuard};

use super::geometry::Point;

#[derive(Debug, Default)]
struct SurfaceState {
    /// A drag session is active on this surface.
    dragging: bool,
    /// A drag became active during the current physical touch.
    touch_claimed: bool,
    /// A touch is currently down on this surface.
    touch_down: bool,
    /// Latest touch point reported by the arbiter.
    last_touch: Option<Point>,
}

/// Cloneable handle shared by one surface's arbiter and drag controller.
#[derive(Debug, Clone, Default)]
pub struct SurfaceContext {
    inner: Arc<Mutex<SurfaceState>>,
}

impl SurfaceContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        // A poisoned lock only means another handler panicked mid-update;
        // the flags are still meaningful.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Raise exclusivity. Also claims the current touch, if any.
    pub fn begin_drag(&self) {
        let mut s = self.state();
        s.dragging = true;
        if s.touch_down {
            s.touch_claimed = true;
        }
    }

    /// Lower exclusivity after drop or cancel. The touch stays claimed until it ends.
    pub fn end_drag(&self) {
        self.state().dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.state().dragging
    }

    /// Start tracking a new physical touch.
    pub fn touch_started(&self, at: Point) {
        let mut s = self.state();
        s.touch_down = true;
        s.touch_claimed = s.dragging;
        s.last_touch = Some(at);
    }

    pub fn touch_moved(&self, at: Point) {
        self.state().last_touch = Some(at);
    }

    /// Finish the current touch. Returns whether a drag claimed it.
    pub fn touch_ended(&self) -> bool {
        let mut s = self.state();
        let claimed = s.touch_claimed || s.dragging;
        s.touch_down = false;
        s.touch_claimed = false;
        s.last_touch = None;
        claimed
    }

    pub fn touch_claimed(&self) -> bool {
        let s = self.state();
        s.touch_claimed || s.dragging
    }

    pub fn last_touch(&self) -> Option<Point> {
        self.state().last_touch
    }

    /// Forget everything. Used when the board is reloaded.
    pub fn reset(&self) {
        *self.state() = SurfaceState::default();
    }
}
