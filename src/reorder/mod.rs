//! Client-side reordering: gesture arbitration, drag sessions and the engine
//! that ties them to a board and its sync client.

pub mod context;
pub mod drag;
pub mod engine;
pub mod geometry;
pub mod gesture;

pub use context::SurfaceContext;
pub use drag::{
    DragConfig, DragPhase, DragSession, DragSessionController, DragStart, DropOutcome, InputKind,
};
pub use engine::BoardEngine;
pub use geometry::{ContainerGeometry, Point, Rect};
pub use gesture::{GestureArbiter, GestureConfig, GestureOutcome, Navigator};
