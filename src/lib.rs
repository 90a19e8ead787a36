pub mod authority;
pub mod board;
pub mod config;
pub mod errors;
pub mod logging;
pub mod reorder;
pub mod sync;
