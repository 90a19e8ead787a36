//! One board's reorder engine.
//!
//! Wires the gesture arbiter and drag controller to a shared surface context,
//! owns the live arrangement, and hands drops to the sync client. A forced
//! reload replaces every piece of in-memory state with the authority's board.

use std::time::Instant;

use tracing::{info, warn};

use super::context::SurfaceContext;
use super::drag::{DragConfig, DragPhase, DragSession, DragSessionController, DragStart};
use super::geometry::{ContainerGeometry, Point};
use super::gesture::{GestureArbiter, GestureConfig, GestureOutcome};
use crate::board::{Arrangement, Board, ContainerRef};
use crate::sync::{SyncClient, SyncOutcome};

#[derive(Debug)]
pub struct BoardEngine {
    ctx: SurfaceContext,
    arrangement: Arrangement,
    arbiter: GestureArbiter,
    drag: DragSessionController,
    sync: SyncClient,
    reloads: usize,
}

impl BoardEngine {
    pub fn new(
        board: &Board,
        gesture: GestureConfig,
        drag: DragConfig,
        mut sync: SyncClient,
    ) -> Self {
        let ctx = SurfaceContext::new();
        let arrangement = Arrangement::from_board(board);
        sync.adopt(board);
        Self {
            arbiter: GestureArbiter::new(gesture, ctx.clone(), arrangement.column_count()),
            drag: DragSessionController::new(drag, ctx.clone()),
            ctx,
            arrangement,
            sync,
            reloads: 0,
        }
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn context(&self) -> &SurfaceContext {
        &self.ctx
    }

    pub fn arbiter(&self) -> &GestureArbiter {
        &self.arbiter
    }

    pub fn drag(&self) -> &DragSessionController {
        &self.drag
    }

    pub fn sync(&self) -> &SyncClient {
        &self.sync
    }

    pub fn current_column(&self) -> usize {
        self.arbiter.current_column()
    }

    /// Forced reloads applied so far.
    pub fn reloads(&self) -> usize {
        self.reloads
    }

    // Touch stream, fed to the arbiter.

    pub fn touch_start(&mut self, point: Point, at: Instant) -> bool {
        self.arbiter.on_touch_start(point, at)
    }

    pub fn touch_move(&mut self, point: Point) {
        self.arbiter.on_touch_move(point);
    }

    pub fn touch_end(&mut self, at: Instant) -> GestureOutcome {
        self.arbiter.on_touch_end(at)
    }

    pub fn touch_cancel(&mut self) {
        self.arbiter.on_touch_cancel();
    }

    // Drag stream, fed to the controller.

    pub fn choose(&mut self, start: DragStart) -> DragPhase {
        self.drag.start(&self.arrangement, start)
    }

    pub fn track(&mut self, pointer: Point, at: Instant) -> DragPhase {
        self.drag.track(&self.arrangement, pointer, at)
    }

    pub fn hover(
        &mut self,
        target: &ContainerRef,
        pointer: Point,
        geometry: &ContainerGeometry,
    ) -> Option<usize> {
        self.drag.hover(&mut self.arrangement, target, pointer, geometry)
    }

    pub fn move_to(&mut self, target: &ContainerRef, index: usize) -> Option<usize> {
        self.drag.move_to(&mut self.arrangement, target, index)
    }

    pub fn cancel(&mut self) -> DragPhase {
        self.drag.cancel(&mut self.arrangement)
    }

    /// Drop the active session and persist the result. Returns `None` when
    /// there was nothing to drop (no session, or a tap).
    pub async fn drop_and_sync(&mut self) -> Option<(DragSession, SyncOutcome)> {
        let outcome = self.drag.drop(&self.arrangement)?;
        let result = self.sync.persist_all(&outcome.requests).await;
        let session = match &result {
            SyncOutcome::Committed => self.drag.settle(true),
            SyncOutcome::Reloaded(board) => {
                self.apply_reload(board);
                None
            }
            SyncOutcome::ReloadFailed(e) => {
                warn!(error = %e, "keeping unsynced arrangement; authority unreachable");
                self.drag.settle(false)
            }
        };
        Some((session.unwrap_or(outcome.session), result))
    }

    /// Re-read the board from the authority and rebuild all state from it.
    pub async fn reload(&mut self) -> Result<(), crate::errors::SyncError> {
        let board = self.sync.load().await?;
        self.apply_reload(&board);
        Ok(())
    }

    fn apply_reload(&mut self, board: &Board) {
        self.drag.reset();
        self.ctx.reset();
        self.arrangement = Arrangement::from_board(board);
        self.arbiter.reset(self.arrangement.column_count());
        self.reloads += 1;
        info!(
            columns = board.columns.len(),
            cards = board.card_count(),
            "board reloaded"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::board::{Card, Column, OrderRequest};
    use crate::reorder::drag::InputKind;
    use crate::reorder::geometry::Rect;
    use crate::sync::testing::FlakyStore;

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

    fn engine(fail_on: Option<usize>) -> (BoardEngine, Arc<FlakyStore>) {
        let store = Arc::new(FlakyStore::new(board(), fail_on));
        let engine = BoardEngine::new(
            &board(),
            GestureConfig::default(),
            DragConfig::default(),
            SyncClient::new(store.clone()),
        );
        (engine, store)
    }

    fn start(item: &str, column: &str, index: usize, input: InputKind, at: Instant) -> DragStart {
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

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_cross_column_drop_persists_destination_then_source() {
        let (mut engine, store) = engine(None);
        let t0 = Instant::now();
        engine.choose(start("c2", "a", 1, InputKind::Pointer, t0));
        engine.track(Point::new(50.0, 170.0), t0);
        assert_eq!(engine.move_to(&ContainerRef::column("b"), 1), Some(1));

        let (session, outcome) = engine.drop_and_sync().await.unwrap();
        assert!(outcome.is_committed());
        assert!(session.committed);
        assert_eq!(engine.drag().phase(), DragPhase::Idle);

        let sent = store.replaces.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![
                OrderRequest::cards("b", ids(&["c4", "c2"])),
                OrderRequest::cards("a", ids(&["c1", "c3"])),
            ]
        );
        let authority = store.inner.snapshot().unwrap();
        assert_eq!(authority.locate_card("c2"), Some(("b", 1)));
        assert_eq!(engine.reloads(), 0);
    }

    #[tokio::test]
    async fn test_failed_drop_reloads_exactly_once() {
        let (mut engine, store) = engine(Some(1));
        let t0 = Instant::now();
        engine.choose(start("c2", "a", 1, InputKind::Pointer, t0));
        engine.track(Point::new(50.0, 170.0), t0);
        engine.move_to(&ContainerRef::column("b"), 0);

        let (session, outcome) = engine.drop_and_sync().await.unwrap();
        assert!(matches!(outcome, SyncOutcome::Reloaded(_)));
        assert!(!session.committed);
        assert_eq!(engine.reloads(), 1);
        assert_eq!(store.load_count(), 1);
        // The source-column request was never sent.
        assert_eq!(store.replace_count(), 1);

        // Local state is back to the authority's view.
        assert_eq!(engine.arrangement(), &Arrangement::from_board(&board()));
        assert_eq!(engine.drag().phase(), DragPhase::Idle);
        assert!(!engine.context().is_dragging());
    }

    #[tokio::test]
    async fn test_active_drag_blocks_swipe_navigation() {
        let (mut engine, _) = engine(None);
        let t0 = Instant::now();
        assert!(engine.touch_start(Point::new(50.0, 150.0), t0));
        engine.choose(start("c2", "a", 1, InputKind::Touch, t0));
        let t1 = t0 + Duration::from_millis(160);
        assert_eq!(engine.track(Point::new(50.0, 160.0), t1), DragPhase::Active);

        // A fast horizontal sweep that would otherwise be a swipe.
        engine.touch_move(Point::new(-40.0, 160.0));
        let outcome = engine.touch_end(t0 + Duration::from_millis(250));
        assert_eq!(outcome, GestureOutcome::Drag);
        assert_eq!(engine.current_column(), 0);

        // And no new touch can start while the drag is still active.
        assert!(!engine.touch_start(Point::new(10.0, 10.0), t1));
    }

    #[tokio::test]
    async fn test_swipe_navigates_when_no_drag() {
        let (mut engine, _) = engine(None);
        let t0 = Instant::now();
        engine.touch_start(Point::new(300.0, 150.0), t0);
        engine.touch_move(Point::new(220.0, 152.0));
        assert!(engine.touch_end(t0 + Duration::from_millis(120)).navigated());
        assert_eq!(engine.current_column(), 1);
    }

    #[tokio::test]
    async fn test_tap_does_not_persist() {
        let (mut engine, store) = engine(None);
        engine.choose(start("c1", "a", 0, InputKind::Pointer, Instant::now()));
        assert!(engine.drop_and_sync().await.is_none());
        assert_eq!(store.replace_count(), 0);
    }

    #[tokio::test]
    async fn test_reload_resets_navigation_and_arrangement() {
        let (mut engine, store) = engine(None);
        let t0 = Instant::now();
        for _ in 0..2 {
            engine.touch_start(Point::new(300.0, 150.0), t0);
            engine.touch_move(Point::new(200.0, 150.0));
            engine.touch_end(t0 + Duration::from_millis(100));
        }
        assert_eq!(engine.current_column(), 2);

        // Another client drops column c.
        store
            .inner
            .call(|s| s.replace_column_order(&ids(&["b", "a", "c"])))
            .await
            .unwrap();
        engine.reload().await.unwrap();
        assert_eq!(
            engine.arrangement().derive(&ContainerRef::Board).unwrap(),
            ids(&["b", "a", "c"])
        );
        assert_eq!(engine.current_column(), 2);
        assert_eq!(engine.reloads(), 1);
    }
}
