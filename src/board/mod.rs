//! Board data: the shared models, the presentation-side order model and the
//! authoritative store behind the reference server.

pub mod models;
pub mod order;
pub mod store;

pub use models::{Board, Card, CardId, Column, ColumnId, EndpointKind, OrderRequest, OrderScope};
pub use order::{Arrangement, Container, ContainerRef, Slot, derive_order};
