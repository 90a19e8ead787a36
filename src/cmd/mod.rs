//! CLI command implementations.
//!
//! | Module    | Commands handled     |
//! |-----------|----------------------|
//! | `serve`   | `Serve`              |
//! | `board`   | `Board`, `Order`     |
//! | `config`  | `Config`             |

pub mod board;
pub mod config;
pub mod serve;

pub use board::{cmd_board, cmd_order};
pub use config::cmd_config;
pub use serve::cmd_serve;
