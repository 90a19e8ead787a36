//! Sync client: pushes derived orders to the remote authority.
//!
//! Every write is a full replace. Any failure (transport, non-success status,
//! local store rejection) is logged and handed to the `RecoveryPolicy`; the
//! default `FullReload` throws local state away and re-reads the board. There
//! is no retry and no merge.

pub mod http;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::board::store::StoreHandle;
use crate::board::{Board, EndpointKind, OrderRequest, OrderScope};
use crate::errors::SyncError;

pub use http::HttpOrderStore;

/// The persistence interface the sync client consumes.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Atomically replace one ordering.
    async fn replace_order(&self, request: &OrderRequest) -> Result<(), SyncError>;

    /// Read the full board, for rebuilding state after a failure.
    async fn load_board(&self) -> Result<Board, SyncError>;
}

/// In-process authority, used by the server's own tooling and in tests.
#[async_trait]
impl OrderStore for StoreHandle {
    async fn replace_order(&self, request: &OrderRequest) -> Result<(), SyncError> {
        StoreHandle::replace_order(self, request.clone())
            .await
            .map_err(SyncError::from)
    }

    async fn load_board(&self) -> Result<Board, SyncError> {
        self.snapshot().map_err(SyncError::from)
    }
}

/// Result of pushing one drop (one or more requests).
#[derive(Debug)]
pub enum SyncOutcome {
    /// Every request was accepted; the arrangement is the new baseline.
    Committed,
    /// A request failed and the board was re-read from the authority.
    Reloaded(Board),
    /// A request failed and the reload failed too.
    ReloadFailed(SyncError),
}

impl SyncOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// What to do after a failed write.
#[async_trait]
pub trait RecoveryPolicy: Send + Sync {
    async fn recover(&self, store: &dyn OrderStore, failure: &SyncError) -> SyncOutcome;
}

/// Discard local state and reload the whole board.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullReload;

#[async_trait]
impl RecoveryPolicy for FullReload {
    async fn recover(&self, store: &dyn OrderStore, failure: &SyncError) -> SyncOutcome {
        warn!(cause = %failure, "reloading board from authority");
        match store.load_board().await {
            Ok(board) => SyncOutcome::Reloaded(board),
            Err(e) => {
                error!(error = %e, "board reload failed");
                SyncOutcome::ReloadFailed(e)
            }
        }
    }
}

/// Last orders known to be persisted, per scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Baseline {
    orders: HashMap<OrderScope, Vec<String>>,
}

impl Baseline {
    pub fn from_board(board: &Board) -> Self {
        let mut orders = HashMap::new();
        orders.insert(OrderScope::BoardColumns, board.column_ids());
        for column in &board.columns {
            orders.insert(OrderScope::ColumnCards(column.id.clone()), column.card_ids());
        }
        Self { orders }
    }

    pub fn get(&self, scope: &OrderScope) -> Option<&[String]> {
        self.orders.get(scope).map(Vec::as_slice)
    }

    pub fn commit(&mut self, request: &OrderRequest) {
        self.orders.insert(request.scope.clone(), request.ids.clone());
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub attempts: usize,
    pub commits: usize,
    pub reloads: usize,
}

pub struct SyncClient {
    store: Arc<dyn OrderStore>,
    recovery: Box<dyn RecoveryPolicy>,
    baseline: Baseline,
    stats: SyncStats,
}

impl SyncClient {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self::with_recovery(store, Box::new(FullReload))
    }

    pub fn with_recovery(store: Arc<dyn OrderStore>, recovery: Box<dyn RecoveryPolicy>) -> Self {
        Self {
            store,
            recovery,
            baseline: Baseline::default(),
            stats: SyncStats::default(),
        }
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Adopt `board` as the committed baseline.
    pub fn adopt(&mut self, board: &Board) {
        self.baseline = Baseline::from_board(board);
    }

    /// Read the board from the authority and adopt it.
    pub async fn load(&mut self) -> Result<Board, SyncError> {
        let board = self.store.load_board().await?;
        self.adopt(&board);
        Ok(board)
    }

    /// Persist one ordering, identified by endpoint kind and scope id. The
    /// scope id is ignored for board columns.
    pub async fn persist_order(
        &mut self,
        kind: EndpointKind,
        scope_id: Option<&str>,
        ids: Vec<String>,
    ) -> SyncOutcome {
        match OrderScope::from_parts(kind, scope_id) {
            Some(scope) => self.persist(&OrderRequest { scope, ids }).await,
            None => self.fail(SyncError::MissingScope { kind }).await,
        }
    }

    pub async fn persist(&mut self, request: &OrderRequest) -> SyncOutcome {
        self.persist_all(std::slice::from_ref(request)).await
    }

    /// Send `requests` in order, stopping at the first failure. A failure
    /// triggers exactly one recovery and nothing after it is sent.
    pub async fn persist_all(&mut self, requests: &[OrderRequest]) -> SyncOutcome {
        for request in requests {
            self.stats.attempts += 1;
            if let Err(e) = self.store.replace_order(request).await {
                error!(scope = %request.scope, error = %e, "failed to persist order");
                return self.fail(e).await;
            }
            info!(scope = %request.scope, items = request.ids.len(), "order committed");
            self.baseline.commit(request);
            self.stats.commits += 1;
        }
        SyncOutcome::Committed
    }

    async fn fail(&mut self, failure: SyncError) -> SyncOutcome {
        self.baseline.clear();
        self.stats.reloads += 1;
        let outcome = self.recovery.recover(self.store.as_ref(), &failure).await;
        if let SyncOutcome::Reloaded(board) = &outcome {
            self.adopt(board);
        }
        outcome
    }
}

impl std::fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncClient")
            .field("baseline", &self.baseline)
            .field("stats", &self.stats)
            .finish()
    }
}
