//! Room orchestration for the battle-royale engine
//!
//! A [`Room`] owns every player of one match and drives them on a virtual clock:
//!
//! - [`agent`]: the [`Agent`] capability and the human-input [`PlayerAgent`]
//! - [`bot`]: [`AutomatedAgent`], a depth-first placement bot
//! - [`scheduler`]: virtual clock with periodic ticks and one-shot garbage delivery
//! - [`room`]: ticks, attack routing, elimination ranks and win detection
//! - [`event`]: what a room reports to the transport layer
//!
//! Nothing here reads a wall clock. The transport layer calls [`Room::advance`] with real
//! elapsed time; tests call it with whatever time they want to simulate.
//!
//! # Example
//!
//! ```
//! use royale_room::{Room, RoomConfig, RoomEvent};
//! use royale_room::types::{PlayerAction, PlayerId, RoomId};
//!
//! let mut room = Room::new(RoomId::from("lobby"), RoomConfig::with_seed(42));
//! room.add_player(PlayerId::from("alice"), "Alice").unwrap();
//! room.add_player(PlayerId::from("bob"), "Bob").unwrap();
//! room.start();
//!
//! room.handle_input(&PlayerId::from("alice"), PlayerAction::HardDrop).unwrap();
//! room.advance(1_000);
//!
//! let events = room.drain_events();
//! assert!(matches!(events[0], RoomEvent::HardDrop { .. }));
//! ```

pub mod agent;
pub mod bot;
pub mod config;
pub mod error;
pub mod event;
pub mod room;
pub mod scheduler;

pub use royale_core as core;
pub use royale_types as types;

pub use agent::{Agent, Contender, DropOutcome, PlayerAgent, PlayerView};
pub use bot::{AutomatedAgent, Placement};
pub use config::{GarbageDelivery, RoomConfig};
pub use error::RoomError;
pub use event::RoomEvent;
pub use room::{Room, TEST_ATTACKER};
pub use scheduler::{Scheduler, Task};
