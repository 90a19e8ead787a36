//! Authoritative board storage.
//!
//! The board is kept in memory and written through to `.bangbang.md` (YAML
//! front matter) after every successful replace. A replace either applies in
//! full or leaves the board untouched.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use super::models::{Board, Card, CardId, ColumnId, OrderRequest, OrderScope};
use crate::errors::StoreError;

pub const BOARD_FILE_NAME: &str = ".bangbang.md";

const DELIMITER: &str = "---";

/// Parse a board from a markdown document carrying YAML front matter.
pub fn parse_front_matter(content: &str) -> Result<Board, StoreError> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 3 {
        return Err(StoreError::FrontMatter("no front matter found".into()));
    }
    if lines[0].trim() != DELIMITER {
        return Err(StoreError::FrontMatter("front matter start not found".into()));
    }
    let end = lines
        .iter()
        .skip(1)
        .position(|l| l.trim() == DELIMITER)
        .map(|i| i + 1)
        .ok_or_else(|| StoreError::FrontMatter("front matter end not found".into()))?;

    let yaml = lines[1..end].join("\n");
    Ok(serde_yaml::from_str(&yaml)?)
}

/// Render a board as front matter.
pub fn render_front_matter(board: &Board) -> Result<String, StoreError> {
    let yaml = serde_yaml::to_string(board)?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n"))
}

pub struct BoardStore {
    board: Board,
    path: Option<PathBuf>,
}

impl BoardStore {
    pub fn in_memory(board: Board) -> Self {
        Self { board, path: None }
    }

    /// Open the board file in `dir`, creating a default board when absent.
    pub fn open(dir: &Path, file_name: &str) -> Result<Self, StoreError> {
        let path = dir.join(file_name);
        if !path.exists() {
            let board = Board::default_board();
            write_board(&path, &board)?;
            info!(path = %path.display(), "created default board");
            return Ok(Self {
                board,
                path: Some(path),
            });
        }
        let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let board = parse_front_matter(&content)?;
        debug!(path = %path.display(), columns = board.columns.len(), "loaded board");
        Ok(Self {
            board,
            path: Some(path),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replace the board's column order. `ids` must name every column exactly once.
    pub fn replace_column_order(&mut self, ids: &[ColumnId]) -> Result<(), StoreError> {
        reject_duplicates(ids)?;
        let mut columns = Vec::with_capacity(ids.len());
        for id in ids {
            let column = self
                .board
                .column(id)
                .ok_or_else(|| StoreError::ColumnNotFound { id: id.clone() })?;
            columns.push(column.clone());
        }
        if columns.len() != self.board.columns.len() {
            return Err(StoreError::IncompleteColumnOrder {
                given: columns.len(),
                expected: self.board.columns.len(),
            });
        }

        let mut next = self.board.clone();
        next.columns = columns;
        self.commit(next)?;
        info!(order = ?ids, "replaced column order");
        Ok(())
    }

    /// Replace a column's card order. Listed cards held by other columns are
    /// moved in; every card already in the column must be listed.
    pub fn replace_card_order(
        &mut self,
        column_id: &str,
        ids: &[CardId],
    ) -> Result<(), StoreError> {
        let target = self
            .board
            .columns
            .iter()
            .position(|c| c.id == column_id)
            .ok_or_else(|| StoreError::ColumnNotFound {
                id: column_id.to_string(),
            })?;
        reject_duplicates(ids)?;

        for id in ids {
            if self.board.locate_card(id).is_none() {
                return Err(StoreError::CardNotFound { id: id.clone() });
            }
        }
        let listed: HashSet<&str> = ids.iter().map(String::as_str).collect();
        if let Some(orphan) = self.board.columns[target]
            .cards
            .iter()
            .find(|c| !listed.contains(c.id.as_str()))
        {
            return Err(StoreError::OrphanedCard {
                card: orphan.id.clone(),
                column: column_id.to_string(),
            });
        }

        let mut next = self.board.clone();
        let mut pulled: Vec<Card> = Vec::with_capacity(ids.len());
        for column in next.columns.iter_mut() {
            let (moving, staying): (Vec<Card>, Vec<Card>) = std::mem::take(&mut column.cards)
                .into_iter()
                .partition(|c| listed.contains(c.id.as_str()));
            column.cards = staying;
            pulled.extend(moving);
        }
        let cards = ids
            .iter()
            .filter_map(|id| pulled.iter().position(|c| &c.id == id))
            .map(|pos| pulled[pos].clone())
            .collect();
        next.columns[target].cards = cards;

        self.commit(next)?;
        info!(column = column_id, order = ?ids, "replaced card order");
        Ok(())
    }

    fn commit(&mut self, next: Board) -> Result<(), StoreError> {
        if let Some(path) = &self.path {
            write_board(path, &next)?;
        }
        self.board = next;
        Ok(())
    }
}

fn reject_duplicates(ids: &[String]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    match ids.iter().find(|id| !seen.insert(id.as_str())) {
        Some(dup) => Err(StoreError::DuplicateId { id: dup.clone() }),
        None => Ok(()),
    }
}

fn write_board(path: &Path, board: &Board) -> Result<(), StoreError> {
    let content = render_front_matter(board)?;
    std::fs::write(path, content).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Shared handle to the store. Every request locks the whole store, which
/// serialises replaces per scope (and across scopes).
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<BoardStore>>,
}

impl StoreHandle {
    pub fn new(store: BoardStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run a closure against the store on a blocking thread.
    pub async fn call<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut BoardStore) -> Result<R, StoreError> + Send + 'static,
        R: Send + 'static,
    {
        let store = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = store.lock().map_err(|_| StoreError::LockPoisoned)?;
            f(&mut guard)
        })
        .await
        .map_err(|_| StoreError::LockPoisoned)?
    }

    /// Apply a replace-order request to whichever ordering it names.
    pub async fn replace_order(&self, request: OrderRequest) -> Result<(), StoreError> {
        self.call(move |store| match &request.scope {
            OrderScope::BoardColumns => store.replace_column_order(&request.ids),
            OrderScope::ColumnCards(column) => store.replace_card_order(column, &request.ids),
        })
        .await
    }

    pub fn snapshot(&self) -> Result<Board, StoreError> {
        self.inner
            .lock()
            .map(|s| s.board().clone())
            .map_err(|_| StoreError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::models::Column;
    use tempfile::TempDir;

    fn store() -> BoardStore {
        BoardStore::in_memory(Board {
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
        })
    }

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn replace_column_order_reorders() {
        let mut s = store();
        s.replace_column_order(&ids(&["c", "a", "b"])).unwrap();
        assert_eq!(s.board().column_ids(), ids(&["c", "a", "b"]));
        // Cards travel with their column.
        assert_eq!(s.board().column("a").unwrap().card_ids(), ids(&["c1", "c2", "c3"]));
    }

    #[test]
    fn replace_column_order_is_idempotent() {
        let mut s = store();
        s.replace_column_order(&ids(&["b", "a", "c"])).unwrap();
        let first = s.board().clone();
        s.replace_column_order(&ids(&["b", "a", "c"])).unwrap();
        assert_eq!(s.board(), &first);
    }

    #[test]
    fn replace_column_order_rejects_bad_requests() {
        let mut s = store();
        let before = s.board().clone();
        assert!(matches!(
            s.replace_column_order(&ids(&["a", "b"])),
            Err(StoreError::IncompleteColumnOrder { given: 2, expected: 3 })
        ));
        assert!(matches!(
            s.replace_column_order(&ids(&["a", "a", "b"])),
            Err(StoreError::DuplicateId { .. })
        ));
        assert!(matches!(
            s.replace_column_order(&ids(&["a", "b", "zz"])),
            Err(StoreError::ColumnNotFound { .. })
        ));
        assert_eq!(s.board(), &before);
    }

    #[test]
    fn replace_card_order_within_column() {
        let mut s = store();
        s.replace_card_order("a", &ids(&["c3", "c1", "c2"])).unwrap();
        assert_eq!(s.board().column("a").unwrap().card_ids(), ids(&["c3", "c1", "c2"]));
    }

    #[test]
    fn replace_card_order_moves_cards_across_columns() {
        let mut s = store();
        s.replace_card_order("b", &ids(&["c4", "c2"])).unwrap();
        assert_eq!(s.board().column("b").unwrap().card_ids(), ids(&["c4", "c2"]));
        assert_eq!(s.board().column("a").unwrap().card_ids(), ids(&["c1", "c3"]));
        // The source column's own replace is now a no-op.
        s.replace_card_order("a", &ids(&["c1", "c3"])).unwrap();
        assert_eq!(s.board().card_count(), 4);
    }

    #[test]
    fn replace_card_order_into_empty_column() {
        let mut s = store();
        s.replace_card_order("c", &ids(&["c4"])).unwrap();
        assert_eq!(s.board().column("c").unwrap().card_ids(), ids(&["c4"]));
        assert!(s.board().column("b").unwrap().cards.is_empty());
    }

    #[test]
    fn replace_card_order_rejects_orphans_and_unknowns() {
        let mut s = store();
        let before = s.board().clone();
        assert!(matches!(
            s.replace_card_order("a", &ids(&["c1", "c3"])),
            Err(StoreError::OrphanedCard { .. })
        ));
        assert!(matches!(
            s.replace_card_order("a", &ids(&["c1", "c2", "c3", "c99"])),
            Err(StoreError::CardNotFound { .. })
        ));
        assert!(matches!(
            s.replace_card_order("zz", &ids(&["c1"])),
            Err(StoreError::ColumnNotFound { .. })
        ));
        assert_eq!(s.board(), &before);
    }

    #[test]
    fn front_matter_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let mut s = BoardStore::open(dir.path(), BOARD_FILE_NAME).unwrap();
        assert_eq!(s.board().column_ids(), ids(&["todo", "in-progress", "review", "done"]));

        s.replace_column_order(&ids(&["done", "todo", "in-progress", "review"]))
            .unwrap();
        let reopened = BoardStore::open(dir.path(), BOARD_FILE_NAME).unwrap();
        assert_eq!(
            reopened.board().column_ids(),
            ids(&["done", "todo", "in-progress", "review"])
        );
    }

    #[test]
    fn parse_front_matter_errors() {
        assert!(matches!(
            parse_front_matter("title: x"),
            Err(StoreError::FrontMatter(_))
        ));
        assert!(matches!(
            parse_front_matter("nope\ntitle: x\n---\n"),
            Err(StoreError::FrontMatter(_))
        ));
        assert!(matches!(
            parse_front_matter("---\ntitle: x\ncolumns: []\n"),
            Err(StoreError::FrontMatter(_))
        ));
        assert!(matches!(
            parse_front_matter("---\ntitle: [unclosed\n---\n"),
            Err(StoreError::Yaml(_))
        ));
    }

    #[test]
    fn parse_front_matter_reads_tasks() {
        let doc = "---\ntitle: Demo\ncolumns:\n  - id: todo\n    title: To Do\n    tasks:\n      - id: t1\n        title: First\n        description: d\n---\n# notes\n";
        let board = parse_front_matter(doc).unwrap();
        assert_eq!(board.title, "Demo");
        assert_eq!(board.column("todo").unwrap().card_ids(), ids(&["t1"]));
    }

    #[tokio::test]
    async fn handle_call_applies_on_blocking_thread() {
        let handle = StoreHandle::new(store());
        handle
            .call(|s| s.replace_column_order(&["c".to_string(), "b".into(), "a".into()]))
            .await
            .unwrap();
        assert_eq!(handle.snapshot().unwrap().column_ids(), ids(&["c", "b", "a"]));
    }

    #[tokio::test]
    async fn handle_replace_order_dispatches_on_scope() {
        let handle = StoreHandle::new(store());
        handle
            .replace_order(OrderRequest::cards("b", ids(&["c4", "c1"])))
            .await
            .unwrap();
        let board = handle.snapshot().unwrap();
        assert_eq!(board.locate_card("c1"), Some(("b", 1)));

        let err = handle
            .replace_order(OrderRequest::columns(ids(&["a"])))
            .await
            .unwrap_err();
        assert!(err.is_invalid_request());
    }
}
