use serde::{Deserialize, Serialize};

pub type ColumnId = String;
pub type CardId = String;

/// A single card. Its owning column and position are implicit in where it
/// sits inside `Column::cards`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Card {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    #[serde(default, rename = "tasks", alias = "cards")]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = cards;
        self
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|c| c.id.clone()).collect()
    }
}

/// The whole board. Column order is positional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Board {
    pub title: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Board {
    /// The board written when no board file exists yet.
    pub fn default_board() -> Self {
        Self {
            title: "My Board".to_string(),
            columns: vec![
                Column::new("todo", "To Do"),
                Column::new("in-progress", "In Progress"),
                Column::new("review", "Review"),
                Column::new("done", "Done"),
            ],
        }
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_ids(&self) -> Vec<ColumnId> {
        self.columns.iter().map(|c| c.id.clone()).collect()
    }

    /// Owning column id and position of a card.
    pub fn locate_card(&self, card_id: &str) -> Option<(&str, usize)> {
        self.columns.iter().find_map(|col| {
            col.cards
                .iter()
                .position(|c| c.id == card_id)
                .map(|pos| (col.id.as_str(), pos))
        })
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }
}

/// Which replace-order endpoint a request goes to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    BoardColumns,
    ColumnCards,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BoardColumns => "board_columns",
            Self::ColumnCards => "column_cards",
        }
    }
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ordering a replace-order request overwrites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "column", rename_all = "snake_case")]
pub enum OrderScope {
    BoardColumns,
    ColumnCards(ColumnId),
}

impl OrderScope {
    /// Build a scope from an endpoint kind and scope id. The scope id is
    /// ignored for board columns and required for column cards.
    pub fn from_parts(kind: EndpointKind, scope_id: Option<&str>) -> Option<Self> {
        match kind {
            EndpointKind::BoardColumns => Some(Self::BoardColumns),
            EndpointKind::ColumnCards => scope_id.map(|id| Self::ColumnCards(id.to_string())),
        }
    }

    /// Segments of the replace-order endpoint path. The column id is one
    /// opaque segment and must be percent-encoded as such.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::BoardColumns => vec!["api", "columns", "order"],
            Self::ColumnCards(column) => vec!["api", "columns", column.as_str(), "cards", "order"],
        }
    }

    /// Unencoded endpoint path, for diagnostics.
    pub fn path(&self) -> String {
        match self {
            Self::BoardColumns => "/api/columns/order".to_string(),
            Self::ColumnCards(column) => format!("/api/columns/{}/cards/order", column),
        }
    }
}

impl std::fmt::Display for OrderScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BoardColumns => f.write_str("board columns"),
            Self::ColumnCards(column) => write!(f, "cards of column {}", column),
        }
    }
}

/// One full-replace order write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub scope: OrderScope,
    pub ids: Vec<String>,
}

impl OrderRequest {
    pub fn columns(ids: Vec<ColumnId>) -> Self {
        Self {
            scope: OrderScope::BoardColumns,
            ids,
        }
    }

    pub fn cards(column: impl Into<String>, ids: Vec<CardId>) -> Self {
        Self {
            scope: OrderScope::ColumnCards(column.into()),
            ids,
        }
    }

    /// JSON body expected by the endpoint.
    pub fn body(&self) -> serde_json::Value {
        match self.scope {
            OrderScope::BoardColumns => serde_json::json!({ "columns": self.ids }),
            OrderScope::ColumnCards(_) => serde_json::json!({ "cards": self.ids }),
        }
    }
}

// Wire payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnOrderRequest {
    pub columns: Vec<ColumnId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardOrderRequest {
    pub cards: Vec<CardId>,
}
