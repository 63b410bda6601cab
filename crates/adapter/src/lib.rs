//! Adapter crate - async transport boundary for battle-royale rooms
//!
//! Rooms from `royale-room` are synchronous and run on a virtual clock. This crate gives
//! each room its own tokio task and exposes it through a cloneable [`RoomHandle`]:
//!
//! 1. **Registry**: [`RoomRegistry`] creates a room on first join and drops it when the
//!    last player leaves.
//! 2. **Runtime**: the room task advances the room by real elapsed time, applies queued
//!    commands, and publishes messages on a broadcast channel.
//! 3. **Protocol**: every room event maps onto one JSON [`ServerMessage`], and a full
//!    `gameState` is broadcast on the snapshot cadence.
//! 4. **Store**: wins are recorded through [`WinStore`] and a `leaderboard` follows
//!    every `gameWinner`.
//!
//! # Environment Variables
//!
//! - `ROYALE_TICK_MS`: real-time step between room advances (default: 16)
//! - `ROYALE_SNAPSHOT_MS`: state broadcast period (default: 33)
//! - `ROYALE_GRAVITY_MS`: gravity period (default: 1000)
//! - `ROYALE_SEED`: base seed for rooms
//! - `ROYALE_GARBAGE_DELIVERY`: `immediate` or `buffered`

pub mod config;
pub mod protocol;
pub mod registry;
pub mod runtime;
pub mod store;

pub use royale_types as types;

pub use config::AdapterConfig;
pub use protocol::{
    decode_client, encode, event_message, state_message, ClientMessage, InitMessage,
    ServerMessage,
};
pub use registry::{random_nickname, Joined, RoomRegistry};
pub use runtime::{spawn_room, AdapterError, RoomCommand, RoomHandle};
pub use store::{LeaderboardEntry, MemoryWinStore, WinStore, LEADERBOARD_LEN};
