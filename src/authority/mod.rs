//! Remote authority: the reference server that owns the board.
//!
//! ```text
//! ┌─────────────┐   HTTP   ┌───────────────────────────────────────────┐
//! │ SyncClient  │ ───────> │  server.rs  (axum Router, ServerConfig)    │
//! │ (HttpOrder- │ <─────── │    └─ api.rs  (handlers, AppState)         │
//! │  Store)     │          │         │                                  │
//! └─────────────┘          │         v                                  │
//!                          │  board::store  (StoreHandle → .bangbang.md) │
//!                          └───────────────────────────────────────────┘
//! ```
//!
//! | Route                                   | Effect                          |
//! |-----------------------------------------|---------------------------------|
//! | `GET /api/board`                        | full board JSON                 |
//! | `PUT /api/columns/order`                | replace column order            |
//! | `PUT /api/columns/{column_id}/cards/order` | replace one column's cards   |
//! | `GET /health`                           | `ok`                            |

pub mod api;
pub mod server;

pub use api::{ApiError, AppState, SharedState, api_router};
pub use server::{ServerConfig, build_router, start_server};
