//! Battle-royale Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates under one `royale_tetris::{types,core,room,adapter}`
//! path so binaries and integration tests depend on a single package.

pub use royale_adapter as adapter;
pub use royale_core as core;
pub use royale_room as room;
pub use royale_types as types;
