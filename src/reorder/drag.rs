//! Drag session controller.
//!
//! One controller per board handles both variants: columns reordered along
//! the board row, and cards reordered within or across columns.
//!
//! ```text
//!  idle ──start──> choosing ──threshold met──> active ──drop──> dropped ──settle──> idle
//!                     │                          │
//!                     └── tap / scroll ──> idle  └──cancel──> cancelled ──> idle
//! ```
//!
//! While a session is active the controller is the only writer of the
//! `Arrangement`, and the shared context's exclusivity flag is raised.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::context::SurfaceContext;
use super::geometry::{ContainerGeometry, Point, Rect, SwapRule, insertion_index};
use super::gesture::admits_drag_start;
use crate::board::models::{OrderRequest, OrderScope};
use crate::board::order::{Arrangement, ContainerRef};

#[derive(Debug, Clone, PartialEq)]
pub struct DragConfig {
    /// Touch sessions may not activate before this much hold time
    pub touch_delay: Duration,
    /// Pointer travel before a session activates
    pub move_threshold: f64,
    pub swap_threshold: f64,
    pub invert_swap: bool,
    /// Extra tolerance around an empty container
    pub empty_insert_threshold: f64,
    /// Touch starts this close to an item's top edge are rejected
    pub edge_margin: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            touch_delay: Duration::from_millis(150),
            move_threshold: 5.0,
            swap_threshold: 0.5,
            invert_swap: true,
            empty_insert_threshold: 5.0,
            edge_margin: 10.0,
        }
    }
}

impl DragConfig {
    fn swap_rule(&self) -> SwapRule {
        SwapRule {
            threshold: self.swap_threshold,
            invert: self.invert_swap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Pointer,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    Column,
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    #[default]
    Idle,
    Choosing,
    Active,
    Dropped,
    Cancelled,
}

/// The "choose" event that opens a session.
#[derive(Debug, Clone)]
pub struct DragStart {
    pub item: String,
    pub source: ContainerRef,
    pub source_index: usize,
    pub pointer: Point,
    pub item_bounds: Rect,
    pub input: InputKind,
    pub at: Instant,
}

/// The transient record of one reorder operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    pub item: String,
    pub kind: DragKind,
    pub input: InputKind,
    pub source: ContainerRef,
    pub source_index: usize,
    pub target: ContainerRef,
    pub target_index: usize,
    /// Set once the authority has accepted the resulting order.
    pub committed: bool,
}

impl DragSession {
    pub fn crossed_containers(&self) -> bool {
        self.source != self.target
    }
}

/// What a drop hands to the sync client.
#[derive(Debug, Clone, PartialEq)]
pub struct DropOutcome {
    pub session: DragSession,
    /// Replace-order requests, in the order they must be sent.
    pub requests: Vec<OrderRequest>,
}

#[derive(Debug)]
enum SessionState {
    Idle,
    Choosing {
        session: DragSession,
        origin: Point,
        started_at: Instant,
    },
    Active {
        session: DragSession,
        snapshot: Arrangement,
    },
    Dropped {
        session: DragSession,
    },
}

#[derive(Debug)]
pub struct DragSessionController {
    config: DragConfig,
    ctx: SurfaceContext,
    state: SessionState,
}

impl DragSessionController {
    pub fn new(config: DragConfig, ctx: SurfaceContext) -> Self {
        Self {
            config,
            ctx,
            state: SessionState::Idle,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn phase(&self) -> DragPhase {
        match self.state {
            SessionState::Idle => DragPhase::Idle,
            SessionState::Choosing { .. } => DragPhase::Choosing,
            SessionState::Active { .. } => DragPhase::Active,
            SessionState::Dropped { .. } => DragPhase::Dropped,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Choosing { session, .. }
            | SessionState::Active { session, .. }
            | SessionState::Dropped { session } => Some(session),
        }
    }

    /// Open a session in `choosing`. Rejected starts leave the controller
    /// where it was (normally `idle`).
    pub fn start(&mut self, arrangement: &Arrangement, start: DragStart) -> DragPhase {
        if !matches!(self.state, SessionState::Idle) || self.ctx.is_dragging() {
            debug!(item = %start.item, phase = ?self.phase(), "drag start rejected: surface busy");
            return self.phase();
        }
        let held = arrangement
            .container(&start.source)
            .and_then(|c| c.slots.get(start.source_index))
            .is_some_and(|slot| slot.is(&start.item));
        if !held {
            debug!(
                item = %start.item,
                source = %start.source,
                "drag start rejected: item not at source"
            );
            return self.phase();
        }
        if start.input == InputKind::Touch
            && !admits_drag_start(self.config.edge_margin, start.pointer, start.item_bounds)
        {
            debug!(item = %start.item, "drag start rejected: edge margin");
            return self.phase();
        }

        let kind = if start.source.is_board() {
            DragKind::Column
        } else {
            DragKind::Card
        };
        self.state = SessionState::Choosing {
            session: DragSession {
                item: start.item,
                kind,
                input: start.input,
                source: start.source.clone(),
                source_index: start.source_index,
                target: start.source,
                target_index: start.source_index,
                committed: false,
            },
            origin: start.pointer,
            started_at: start.at,
        };
        DragPhase::Choosing
    }

    /// Feed pointer motion. Promotes `choosing` to `active` once the
    /// movement threshold (and, for touch, the hold delay) is met.
    pub fn track(&mut self, arrangement: &Arrangement, pointer: Point, at: Instant) -> DragPhase {
        let SessionState::Choosing {
            session,
            origin,
            started_at,
        } = &self.state
        else {
            return self.phase();
        };
        let travelled = origin.distance(pointer);
        let held_for = at.saturating_duration_since(*started_at);

        let activate = match session.input {
            InputKind::Pointer => travelled >= self.config.move_threshold,
            InputKind::Touch if held_for < self.config.touch_delay => {
                if travelled > self.config.move_threshold {
                    // Moving before the hold delay is a scroll.
                    debug!(item = %session.item, travelled, "touch moved before delay; abandoning");
                    self.state = SessionState::Idle;
                    return DragPhase::Idle;
                }
                false
            }
            InputKind::Touch => travelled >= self.config.move_threshold,
        };
        if !activate {
            return DragPhase::Choosing;
        }

        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        if let SessionState::Choosing { session, .. } = state {
            debug!(item = %session.item, kind = ?session.kind, "drag active");
            self.ctx.begin_drag();
            self.state = SessionState::Active {
                session,
                snapshot: arrangement.clone(),
            };
        }
        self.phase()
    }

    /// Project the dragged item to `target` at `index`. Returns the index
    /// actually used, or `None` when the move is not allowed.
    pub fn move_to(
        &mut self,
        arrangement: &mut Arrangement,
        target: &ContainerRef,
        index: usize,
    ) -> Option<usize> {
        let SessionState::Active { session, .. } = &mut self.state else {
            return None;
        };
        let compatible = match session.kind {
            DragKind::Column => target.is_board(),
            DragKind::Card => !target.is_board(),
        };
        if !compatible {
            return None;
        }
        let used = arrangement.relocate(&session.target, session.target_index, target, index)?;
        session.target = target.clone();
        session.target_index = used;
        Some(used)
    }

    /// Resolve a hover over `target` into a projected position using the
    /// swap heuristic, then move there.
    ///
    /// Touch sessions judge bounds by the last point the gesture arbiter
    /// reported; a point outside the container (beyond the empty-container
    /// tolerance) leaves everything unchanged.
    pub fn hover(
        &mut self,
        arrangement: &mut Arrangement,
        target: &ContainerRef,
        pointer: Point,
        geometry: &ContainerGeometry,
    ) -> Option<usize> {
        let SessionState::Active { session, .. } = &self.state else {
            return None;
        };
        let point = match session.input {
            InputKind::Touch => self.ctx.last_touch().unwrap_or(pointer),
            InputKind::Pointer => pointer,
        };
        if !geometry.accepts(point, self.config.empty_insert_threshold) {
            debug!(target = %target, ?point, "hover outside container bounds");
            return None;
        }

        // Columns sit in a row; reuse the vertical rule on swapped axes.
        let (point, geometry) = match session.kind {
            DragKind::Column => (point.transposed(), geometry.transposed()),
            DragKind::Card => (point, geometry.clone()),
        };
        let current = (&session.target == target).then_some(session.target_index);
        let siblings: Vec<Rect> = geometry
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != current)
            .map(|(_, r)| *r)
            .collect();
        let index = insertion_index(point.y, &siblings, current, self.config.swap_rule());
        self.move_to(arrangement, target, index)
    }

    /// Freeze the arrangement and derive the orders to persist.
    ///
    /// A drop in `choosing` was a tap and yields nothing.
    pub fn drop(&mut self, arrangement: &Arrangement) -> Option<DropOutcome> {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        let session = match state {
            SessionState::Active { session, .. } => session,
            SessionState::Choosing { .. } => return None,
            other => {
                self.state = other;
                return None;
            }
        };
        self.ctx.end_drag();

        let requests = derive_requests(arrangement, &session);
        info!(
            item = %session.item,
            from = %session.source,
            to = %session.target,
            index = session.target_index,
            "drop"
        );
        self.state = SessionState::Dropped {
            session: session.clone(),
        };
        Some(DropOutcome { session, requests })
    }

    /// Abort without persisting and restore the pre-drag arrangement.
    pub fn cancel(&mut self, arrangement: &mut Arrangement) -> DragPhase {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        match state {
            SessionState::Active { session, snapshot } => {
                *arrangement = snapshot;
                self.ctx.end_drag();
                debug!(item = %session.item, "drag cancelled");
                DragPhase::Cancelled
            }
            SessionState::Choosing { .. } => DragPhase::Cancelled,
            other => {
                self.state = other;
                self.phase()
            }
        }
    }

    /// Close a dropped session once sync has finished, returning to `idle`.
    pub fn settle(&mut self, committed: bool) -> Option<DragSession> {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        match state {
            SessionState::Dropped { mut session } => {
                session.committed = committed;
                Some(session)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Abandon whatever is in progress. Used when the board is reloaded.
    pub fn reset(&mut self) {
        if matches!(self.state, SessionState::Active { .. }) {
            self.ctx.end_drag();
        }
        self.state = SessionState::Idle;
    }
}

fn derive_requests(arrangement: &Arrangement, session: &DragSession) -> Vec<OrderRequest> {
    match session.kind {
        DragKind::Column => vec![OrderRequest::columns(
            arrangement.derive(&ContainerRef::Board).unwrap_or_default(),
        )],
        DragKind::Card => {
            // Destination first: its replace moves the card over on the
            // authority, after which the source list is consistent.
            let mut requests: Vec<OrderRequest> = Vec::with_capacity(2);
            for container in [&session.target, &session.source] {
                let ContainerRef::Column(column) = container else {
                    continue;
                };
                if requests
                    .iter()
                    .any(|r| r.scope == OrderScope::ColumnCards(column.clone()))
                {
                    continue;
                }
                let ids = arrangement.derive(container).unwrap_or_default();
                requests.push(OrderRequest::cards(column.clone(), ids));
            }
            requests
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::models::{Board, Card, Column};

    fn board() -> Board {
        Board {
            title: "t".into(),
            columns: vec![
                Column::new("a", "A").with_cards(vec![
                    Card::new("c1", "1"),
                    Card::new("c2", "2"),
                    Card::new("c3", "3"),
                ]),
                Column::new("b", "B").with_cards(vec![Card::new("c4", "4")]),
                Column::new("c", "C"),
            ],
        }
    }

    fn setup() -> (DragSessionController, Arrangement, SurfaceContext) {
        let ctx = SurfaceContext::new();
        let ctl = DragSessionController::new(DragConfig::default(), ctx.clone());
        (ctl, Arrangement::from_board(&board()), ctx)
    }

    fn card_start(
        item: &str,
        column: &str,
        index: usize,
        input: InputKind,
        at: Instant,
    ) -> DragStart {
        DragStart {
            item: item.into(),
            source: ContainerRef::column(column),
            source_index: index,
            pointer: Point::new(50.0, index as f64 * 100.0 + 50.0),
            item_bounds: Rect::new(0.0, index as f64 * 100.0, 200.0, 100.0),
            input,
            at,
        }
    }

    fn activate(ctl: &mut DragSessionController, arr: &Arrangement, start: DragStart) {
        let at = start.at;
        let origin = start.pointer;
        assert_eq!(ctl.start(arr, start), DragPhase::Choosing);
        let moved = Point::new(origin.x, origin.y + 10.0);
        assert_eq!(
            ctl.track(arr, moved, at + Duration::from_millis(200)),
            DragPhase::Active
        );
    }

    #[test]
    fn test_pointer_drag_activates_after_threshold() {
        let (mut ctl, arr, ctx) = setup();
        let t0 = Instant::now();
        ctl.start(&arr, card_start("c1", "a", 0, InputKind::Pointer, t0));
        assert_eq!(ctl.track(&arr, Point::new(52.0, 51.0), t0), DragPhase::Choosing);
        assert!(!ctx.is_dragging());
        assert_eq!(ctl.track(&arr, Point::new(50.0, 56.0), t0), DragPhase::Active);
        assert!(ctx.is_dragging());
    }

    #[test]
    fn test_touch_needs_delay_before_activating() {
        let (mut ctl, arr, ctx) = setup();
        let t0 = Instant::now();
        ctl.start(&arr, card_start("c2", "a", 1, InputKind::Touch, t0));
        // Small jitter inside the delay keeps choosing.
        assert_eq!(
            ctl.track(&arr, Point::new(51.0, 151.0), t0 + Duration::from_millis(50)),
            DragPhase::Choosing
        );
        assert_eq!(
            ctl.track(&arr, Point::new(50.0, 160.0), t0 + Duration::from_millis(160)),
            DragPhase::Active
        );
        assert!(ctx.is_dragging());
    }

    #[test]
    fn test_touch_moving_before_delay_is_scroll() {
        let (mut ctl, arr, ctx) = setup();
        let t0 = Instant::now();
        ctl.start(&arr, card_start("c2", "a", 1, InputKind::Touch, t0));
        assert_eq!(
            ctl.track(&arr, Point::new(50.0, 190.0), t0 + Duration::from_millis(40)),
            DragPhase::Idle
        );
        assert!(!ctx.is_dragging());
        assert!(ctl.session().is_none());
    }

    #[test]
    fn test_touch_start_near_top_edge_never_leaves_idle() {
        let (mut ctl, arr, _) = setup();
        let t0 = Instant::now();
        let mut start = card_start("c2", "a", 1, InputKind::Touch, t0);
        start.pointer = Point::new(50.0, 103.0);
        assert_eq!(ctl.start(&arr, start), DragPhase::Idle);
        assert_eq!(
            ctl.track(&arr, Point::new(50.0, 180.0), t0 + Duration::from_secs(1)),
            DragPhase::Idle
        );
    }

    #[test]
    fn test_start_rejects_mismatched_item() {
        let (mut ctl, arr, _) = setup();
        let start = card_start("c3", "a", 0, InputKind::Pointer, Instant::now());
        assert_eq!(ctl.start(&arr, start), DragPhase::Idle);
    }

    #[test]
    fn test_start_rejected_while_surface_busy() {
        let (mut ctl, arr, ctx) = setup();
        ctx.begin_drag();
        let start = card_start("c1", "a", 0, InputKind::Pointer, Instant::now());
        assert_eq!(ctl.start(&arr, start), DragPhase::Idle);
    }

    #[test]
    fn test_tap_drop_yields_nothing() {
        let (mut ctl, arr, _) = setup();
        ctl.start(&arr, card_start("c1", "a", 0, InputKind::Pointer, Instant::now()));
        assert!(ctl.drop(&arr).is_none());
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_cross_column_drop_derives_both_orders() {
        let (mut ctl, mut arr, ctx) = setup();
        let t0 = Instant::now();
        activate(&mut ctl, &arr, card_start("c2", "a", 1, InputKind::Pointer, t0));
        assert_eq!(ctl.move_to(&mut arr, &ContainerRef::column("b"), 1), Some(1));

        let outcome = ctl.drop(&arr).unwrap();
        assert_eq!(
            outcome.requests,
            vec![
                OrderRequest::cards("b", vec!["c4".into(), "c2".into()]),
                OrderRequest::cards("a", vec!["c1".into(), "c3".into()]),
            ]
        );
        assert!(outcome.session.crossed_containers());
        assert!(!outcome.session.committed);
        assert!(!ctx.is_dragging());
        assert_eq!(ctl.phase(), DragPhase::Dropped);

        let settled = ctl.settle(true).unwrap();
        assert!(settled.committed);
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_same_column_drop_sends_one_order() {
        let (mut ctl, mut arr, _) = setup();
        activate(&mut ctl, &arr, card_start("c1", "a", 0, InputKind::Pointer, Instant::now()));
        ctl.move_to(&mut arr, &ContainerRef::column("a"), 2);
        let outcome = ctl.drop(&arr).unwrap();
        assert_eq!(
            outcome.requests,
            vec![OrderRequest::cards("a", vec!["c2".into(), "c3".into(), "c1".into()])]
        );
    }

    #[test]
    fn test_column_drag_reorders_board_row() {
        let (mut ctl, mut arr, _) = setup();
        let start = DragStart {
            item: "c".into(),
            source: ContainerRef::Board,
            source_index: 2,
            pointer: Point::new(650.0, 20.0),
            item_bounds: Rect::new(600.0, 0.0, 300.0, 600.0),
            input: InputKind::Pointer,
            at: Instant::now(),
        };
        activate(&mut ctl, &arr, start);
        // Cards cannot host a column.
        assert_eq!(ctl.move_to(&mut arr, &ContainerRef::column("a"), 0), None);
        assert_eq!(ctl.move_to(&mut arr, &ContainerRef::Board, 0), Some(0));
        let outcome = ctl.drop(&arr).unwrap();
        assert_eq!(
            outcome.requests,
            vec![OrderRequest::columns(vec!["c".into(), "a".into(), "b".into()])]
        );
    }

    #[test]
    fn test_card_cannot_move_into_board_row() {
        let (mut ctl, mut arr, _) = setup();
        activate(&mut ctl, &arr, card_start("c1", "a", 0, InputKind::Pointer, Instant::now()));
        assert_eq!(ctl.move_to(&mut arr, &ContainerRef::Board, 0), None);
        assert_eq!(arr.derive(&ContainerRef::Board).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cancel_restores_arrangement() {
        let (mut ctl, mut arr, ctx) = setup();
        let before = arr.clone();
        activate(&mut ctl, &arr, card_start("c1", "a", 0, InputKind::Pointer, Instant::now()));
        ctl.move_to(&mut arr, &ContainerRef::column("c"), 0);
        assert_ne!(arr, before);
        assert_eq!(ctl.cancel(&mut arr), DragPhase::Cancelled);
        assert_eq!(arr, before);
        assert!(!ctx.is_dragging());
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_hover_uses_swap_rule() {
        let (mut ctl, mut arr, _) = setup();
        activate(&mut ctl, &arr, card_start("c1", "a", 0, InputKind::Pointer, Instant::now()));
        let geometry = ContainerGeometry::new(
            Rect::new(0.0, 0.0, 200.0, 300.0),
            vec![
                Rect::new(0.0, 0.0, 200.0, 100.0),
                Rect::new(0.0, 100.0, 200.0, 100.0),
                Rect::new(0.0, 200.0, 200.0, 100.0),
            ],
        );
        let a = ContainerRef::column("a");
        // c1 is set aside; siblings are c2 (100..200) and c3 (200..300).
        assert_eq!(ctl.hover(&mut arr, &a, Point::new(50.0, 140.0), &geometry), Some(0));
        assert_eq!(ctl.hover(&mut arr, &a, Point::new(50.0, 160.0), &geometry), Some(1));
        assert_eq!(arr.derive(&a).unwrap(), vec!["c2", "c1", "c3"]);
    }

    #[test]
    fn test_column_hover_swaps_across_row_midpoint() {
        let (mut ctl, mut arr, _) = setup();
        let start = DragStart {
            item: "a".into(),
            source: ContainerRef::Board,
            source_index: 0,
            pointer: Point::new(150.0, 20.0),
            item_bounds: Rect::new(0.0, 0.0, 300.0, 600.0),
            input: InputKind::Pointer,
            at: Instant::now(),
        };
        activate(&mut ctl, &arr, start);
        let row = ContainerGeometry::new(
            Rect::new(0.0, 0.0, 900.0, 600.0),
            vec![
                Rect::new(0.0, 0.0, 300.0, 600.0),
                Rect::new(300.0, 0.0, 300.0, 600.0),
                Rect::new(600.0, 0.0, 300.0, 600.0),
            ],
        );
        let board = ContainerRef::Board;
        // a is set aside; b spans 300..600 with its midpoint at x=450.
        assert_eq!(ctl.hover(&mut arr, &board, Point::new(440.0, 20.0), &row), Some(0));
        assert_eq!(arr.derive(&board).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(ctl.hover(&mut arr, &board, Point::new(460.0, 20.0), &row), Some(1));
        assert_eq!(arr.derive(&board).unwrap(), vec!["b", "a", "c"]);
        // The vertical position within the row plays no part.
        assert_eq!(ctl.hover(&mut arr, &board, Point::new(460.0, 580.0), &row), Some(1));

        let outcome = ctl.drop(&arr).unwrap();
        assert_eq!(
            outcome.requests,
            vec![OrderRequest::columns(vec!["b".into(), "a".into(), "c".into()])]
        );
    }

    #[test]
    fn test_hover_into_empty_column_with_tolerance() {
        let (mut ctl, mut arr, _) = setup();
        activate(&mut ctl, &arr, card_start("c4", "b", 0, InputKind::Pointer, Instant::now()));
        let empty = ContainerGeometry::new(Rect::new(400.0, 0.0, 200.0, 40.0), vec![]);
        let c = ContainerRef::column("c");
        assert_eq!(ctl.hover(&mut arr, &c, Point::new(500.0, 44.0), &empty), Some(0));
        assert_eq!(arr.derive(&c).unwrap(), vec!["c4"]);
    }

    #[test]
    fn test_touch_hover_outside_bounds_is_rejected() {
        let (mut ctl, mut arr, ctx) = setup();
        let t0 = Instant::now();
        ctx.touch_started(Point::new(50.0, 150.0));
        activate(&mut ctl, &arr, card_start("c2", "a", 1, InputKind::Touch, t0));
        ctx.touch_moved(Point::new(900.0, 900.0));
        let before = arr.clone();
        let b = ContainerGeometry::new(
            Rect::new(300.0, 0.0, 200.0, 100.0),
            vec![Rect::new(300.0, 0.0, 200.0, 100.0)],
        );
        // The caller's pointer is inside, but the arbiter saw the touch land outside.
        assert_eq!(
            ctl.hover(&mut arr, &ContainerRef::column("b"), Point::new(350.0, 50.0), &b),
            None
        );
        assert_eq!(arr, before);
    }

    #[test]
    fn test_touch_hover_ignores_point_from_ended_touch() {
        let (mut ctl, mut arr, ctx) = setup();
        // A previous finger lifted far outside every column.
        ctx.touch_started(Point::new(900.0, 900.0));
        ctx.touch_ended();
        activate(&mut ctl, &arr, card_start("c2", "a", 1, InputKind::Touch, Instant::now()));
        let b = ContainerGeometry::new(
            Rect::new(300.0, 0.0, 200.0, 100.0),
            vec![Rect::new(300.0, 0.0, 200.0, 100.0)],
        );
        let target = ContainerRef::column("b");
        assert_eq!(ctl.hover(&mut arr, &target, Point::new(350.0, 20.0), &b), Some(0));
        assert_eq!(arr.derive(&target).unwrap(), vec!["c2", "c4"]);
    }

    #[test]
    fn test_move_sequence_keeps_column_consistent() {
        let (mut ctl, mut arr, _) = setup();
        activate(&mut ctl, &arr, card_start("c3", "a", 2, InputKind::Pointer, Instant::now()));
        let a = ContainerRef::column("a");
        for index in [0, 1, 2, 0, 5] {
            ctl.move_to(&mut arr, &a, index).unwrap();
            let order = arr.derive(&a).unwrap();
            assert_eq!(order.len(), 3);
            assert!(order.contains(&"c3".to_string()));
        }
        let outcome = ctl.drop(&arr).unwrap();
        assert_eq!(outcome.requests[0].ids, arr.derive(&a).unwrap());
    }
}
