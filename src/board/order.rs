//! Presentation-side ordering.
//!
//! `Arrangement` mirrors what the user currently sees: the board's single row
//! of columns plus one card list per column. It is the only state the drag
//! controller mutates. `derive_order` turns a container back into the
//! identifier-only sequence a replace-order request carries.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::models::{Board, ColumnId};

/// Identifies a sortable container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ContainerRef {
    /// The board row; its items are columns.
    Board,
    /// A column's card list; its items are cards.
    Column(ColumnId),
}

impl ContainerRef {
    pub fn column(id: impl Into<String>) -> Self {
        Self::Column(id.into())
    }

    pub fn is_board(&self) -> bool {
        matches!(self, Self::Board)
    }
}

impl std::fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Board => f.write_str("board"),
            Self::Column(id) => write!(f, "column:{}", id),
        }
    }
}

/// A rendered item. Rendering may produce placeholders without an id
/// (ghost elements, empty-state hints), so the id is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: Option<String>,
}

impl Slot {
    pub fn item(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }

    pub fn placeholder() -> Self {
        Self { id: None }
    }

    pub fn is(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: ContainerRef,
    pub slots: Vec<Slot>,
}

impl Container {
    pub fn new(id: ContainerRef, ids: &[&str]) -> Self {
        Self {
            id,
            slots: ids.iter().map(|id| Slot::item(*id)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn position_of(&self, item: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.is(item))
    }
}

/// Walk a container in presentation order and return its identifiers,
/// dropping slots without a usable id and any repeated id.
pub fn derive_order(container: &Container) -> Vec<String> {
    let mut seen = HashSet::new();
    container
        .slots
        .iter()
        .filter_map(|slot| slot.id.as_deref())
        .filter(|id| !id.trim().is_empty())
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// The live arrangement of the whole board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    board: Container,
    lists: Vec<Container>,
}

impl Arrangement {
    /// Build the arrangement the authority's render encodes.
    pub fn from_board(board: &Board) -> Self {
        let board_row = Container {
            id: ContainerRef::Board,
            slots: board.columns.iter().map(|c| Slot::item(&c.id)).collect(),
        };
        let lists = board
            .columns
            .iter()
            .map(|col| Container {
                id: ContainerRef::Column(col.id.clone()),
                slots: col.cards.iter().map(|c| Slot::item(&c.id)).collect(),
            })
            .collect();
        Self {
            board: board_row,
            lists,
        }
    }

    pub fn container(&self, id: &ContainerRef) -> Option<&Container> {
        match id {
            ContainerRef::Board => Some(&self.board),
            ContainerRef::Column(_) => self.lists.iter().find(|c| &c.id == id),
        }
    }

    fn container_mut(&mut self, id: &ContainerRef) -> Option<&mut Container> {
        match id {
            ContainerRef::Board => Some(&mut self.board),
            ContainerRef::Column(_) => self.lists.iter_mut().find(|c| &c.id == id),
        }
    }

    pub fn column_count(&self) -> usize {
        self.board.len()
    }

    /// Move the slot at `from` to `to`, clamping the destination index to the
    /// destination's length after removal. Returns the index actually used.
    pub fn relocate(
        &mut self,
        from: &ContainerRef,
        from_index: usize,
        to: &ContainerRef,
        to_index: usize,
    ) -> Option<usize> {
        if self.container(to).is_none() {
            return None;
        }
        let source = self.container_mut(from)?;
        if from_index >= source.slots.len() {
            return None;
        }
        let slot = source.slots.remove(from_index);
        // `to` was checked above and removal cannot delete a container.
        let dest = self.container_mut(to)?;
        let index = to_index.min(dest.slots.len());
        dest.slots.insert(index, slot);
        Some(index)
    }

    pub fn derive(&self, id: &ContainerRef) -> Option<Vec<String>> {
        self.container(id).map(derive_order)
    }
}
