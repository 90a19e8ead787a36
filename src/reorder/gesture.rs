//! Touch gesture arbitration.
//!
//! A touch on the mobile board can mean three things: reorder an item, swipe
//! to the neighbouring column, or scroll. The arbiter classifies each touch
//! when it ends and makes sure only one interpretation wins. Drag recognition
//! itself belongs to the drag controller; the arbiter only learns about it
//! through the shared `SurfaceContext`.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::context::SurfaceContext;
use super::geometry::{Point, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Longest touch that still counts as a swipe
    pub max_swipe_time: Duration,
    /// Shortest horizontal travel that counts as a swipe
    pub min_swipe_distance: f64,
    /// Touches closer than this to an item's top edge never start a drag
    pub edge_margin: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            max_swipe_time: Duration::from_millis(300),
            min_swipe_distance: 50.0,
            edge_margin: 10.0,
        }
    }
}

/// How a touch was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureMode {
    #[default]
    Undetermined,
    Drag,
    Swipe,
    Scroll,
}

/// One tracked touch, from touch-start to touch-end.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureState {
    pub origin: Point,
    pub current: Point,
    pub started_at: Instant,
    pub mode: GestureMode,
}

impl GestureState {
    /// Horizontal travel; positive when the finger moved left.
    pub fn displacement(&self) -> f64 {
        self.origin.x - self.current.x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// No touch was being tracked.
    Ignored,
    /// A drag owned this touch; navigation was suppressed.
    Drag,
    /// A swipe. `from == to` when already at the end of the row.
    Swipe {
        direction: SwipeDirection,
        from: usize,
        to: usize,
    },
    /// Ordinary scrolling; nothing changes.
    Scroll,
}

impl GestureOutcome {
    pub fn mode(&self) -> GestureMode {
        match self {
            Self::Ignored => GestureMode::Undetermined,
            Self::Drag => GestureMode::Drag,
            Self::Swipe { .. } => GestureMode::Swipe,
            Self::Scroll => GestureMode::Scroll,
        }
    }

    pub fn navigated(&self) -> bool {
        matches!(self, Self::Swipe { from, to, .. } if from != to)
    }
}

/// Which column the single-column mobile view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigator {
    current: usize,
    count: usize,
}

impl Navigator {
    pub fn new(count: usize) -> Self {
        Self { current: 0, count }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn advance(&mut self) -> usize {
        if self.current + 1 < self.count {
            self.current += 1;
        }
        self.current
    }

    pub fn retreat(&mut self) -> usize {
        if self.current > 0 {
            self.current -= 1;
        }
        self.current
    }

    /// Change the number of columns, keeping the current one in range.
    pub fn resize(&mut self, count: usize) {
        self.count = count;
        self.current = self.current.min(count.saturating_sub(1));
    }
}

/// Whether a touch at `point` may start dragging the item drawn at `item`.
/// Touches outside the item, or within `edge_margin` of its top edge, may not.
pub fn admits_drag_start(edge_margin: f64, point: Point, item: Rect) -> bool {
    item.contains(point) && point.y - item.top() >= edge_margin
}

/// Per-surface touch classifier.
#[derive(Debug)]
pub struct GestureArbiter {
    config: GestureConfig,
    ctx: SurfaceContext,
    active: Option<GestureState>,
    nav: Navigator,
}

impl GestureArbiter {
    pub fn new(config: GestureConfig, ctx: SurfaceContext, column_count: usize) -> Self {
        Self {
            config,
            ctx,
            active: None,
            nav: Navigator::new(column_count),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn current_column(&self) -> usize {
        self.nav.current()
    }

    pub fn column_count(&self) -> usize {
        self.nav.count()
    }

    pub fn active(&self) -> Option<&GestureState> {
        self.active.as_ref()
    }

    /// Begin tracking a touch. Returns false when the touch is dropped: a
    /// drag already owns the surface, or another touch is unresolved.
    pub fn on_touch_start(&mut self, point: Point, at: Instant) -> bool {
        if self.ctx.is_dragging() {
            debug!(?point, "touch start dropped: drag in progress");
            return false;
        }
        if self.active.is_some() {
            debug!(?point, "touch start dropped: previous touch unresolved");
            return false;
        }
        self.ctx.touch_started(point);
        self.active = Some(GestureState {
            origin: point,
            current: point,
            started_at: at,
            mode: GestureMode::Undetermined,
        });
        true
    }

    pub fn on_touch_move(&mut self, point: Point) {
        let Some(state) = self.active.as_mut() else {
            return;
        };
        state.current = point;
        self.ctx.touch_moved(point);
        if state.mode == GestureMode::Undetermined && self.ctx.touch_claimed() {
            state.mode = GestureMode::Drag;
        }
    }

    /// Classify the finished touch and apply any navigation.
    pub fn on_touch_end(&mut self, at: Instant) -> GestureOutcome {
        let Some(state) = self.active.take() else {
            return GestureOutcome::Ignored;
        };
        let claimed = self.ctx.touch_ended();
        if claimed || state.mode == GestureMode::Drag {
            debug!("touch ended under a drag; navigation suppressed");
            return GestureOutcome::Drag;
        }

        let displacement = state.displacement();
        let duration = at.saturating_duration_since(state.started_at);
        if duration > self.config.max_swipe_time
            || displacement.abs() < self.config.min_swipe_distance
        {
            return GestureOutcome::Scroll;
        }

        let from = self.nav.current();
        let (direction, to) = if displacement > 0.0 {
            (SwipeDirection::Forward, self.nav.advance())
        } else {
            (SwipeDirection::Backward, self.nav.retreat())
        };
        debug!(?direction, from, to, "swipe");
        GestureOutcome::Swipe {
            direction,
            from,
            to,
        }
    }

    /// The platform cancelled the touch. Nothing is classified.
    pub fn on_touch_cancel(&mut self) {
        if self.active.take().is_some() {
            self.ctx.touch_ended();
        }
    }

    /// Drop any tracked touch and adopt a new column count.
    pub fn reset(&mut self, column_count: usize) {
        self.active = None;
        self.nav.resize(column_count);
    }
}
