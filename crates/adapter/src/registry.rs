//! Registry module - rooms by id
//!
//! A room is created on its first join and torn down when its last player leaves.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use royale_core::SimpleRng;
use royale_room::Room;

use crate::config::AdapterConfig;
use crate::protocol::{InitMessage, ServerMessage};
use crate::runtime::{spawn_room, AdapterError, RoomHandle};
use crate::store::WinStore;
use crate::types::{Difficulty, PlayerId, RoomId};

const ADJECTIVES: [&str; 10] = [
    "Happy", "Lucky", "Sunny", "Clever", "Brave", "Swift", "Calm", "Wild", "Cool", "Fast",
];

const NOUNS: [&str; 10] = [
    "Panda", "Tiger", "Eagle", "Fox", "Wolf", "Bear", "Hawk", "Lion", "Cat", "Dog",
];

/// `AdjectiveNoun##` style name for players who join without one
pub fn random_nickname(rng: &mut SimpleRng) -> String {
    let adjective = rng.pick(&ADJECTIVES).copied().unwrap_or("Happy");
    let noun = rng.pick(&NOUNS).copied().unwrap_or("Panda");
    format!("{adjective}{noun}{}", rng.next_range(100))
}

/// One retry covers a room closing between `open` and the seat request
const SEAT_ATTEMPTS: usize = 2;

struct Entry {
    handle: RoomHandle,
    task: JoinHandle<()>,
}

/// Result of a successful join
pub struct Joined {
    /// Sent only to the joining player
    pub init: InitMessage,
    /// Room stream, subscribed before the player was seated
    pub events: broadcast::Receiver<ServerMessage>,
    pub handle: RoomHandle,
}

pub struct RoomRegistry {
    config: AdapterConfig,
    store: Arc<dyn WinStore>,
    rooms: Mutex<HashMap<RoomId, Entry>>,
    nicknames: Mutex<SimpleRng>,
    created: AtomicU32,
    bots: AtomicU32,
}

impl RoomRegistry {
    pub fn new(config: AdapterConfig, store: Arc<dyn WinStore>) -> Self {
        let nicknames = SimpleRng::new(config.room.seed ^ 0x5eed_cafe);
        Self {
            config,
            store,
            rooms: Mutex::new(HashMap::new()),
            nicknames: Mutex::new(nicknames),
            created: AtomicU32::new(0),
            bots: AtomicU32::new(0),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub async fn len(&self) -> usize {
        self.rooms.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.lock().await.is_empty()
    }

    pub async fn get(&self, room_id: &RoomId) -> Option<RoomHandle> {
        self.rooms
            .lock()
            .await
            .get(room_id)
            .map(|entry| entry.handle.clone())
    }

    /// Handle for `room_id`, spawning the room if it does not exist yet
    pub async fn open(&self, room_id: &RoomId) -> RoomHandle {
        let mut rooms = self.rooms.lock().await;
        if let Some(entry) = rooms.get(room_id) {
            return entry.handle.clone();
        }

        let index = self.created.fetch_add(1, Ordering::Relaxed);
        let room = Room::new(room_id.clone(), self.config.room_config(index));
        let (handle, task) = spawn_room(room, &self.config, Arc::clone(&self.store));
        info!(room = %room_id, "room created");
        rooms.insert(
            room_id.clone(),
            Entry {
                handle: handle.clone(),
                task,
            },
        );
        handle
    }

    pub async fn join(
        &self,
        room_id: &RoomId,
        player_id: PlayerId,
        nickname: Option<String>,
    ) -> Result<Joined> {
        let nickname = match nickname.filter(|n| !n.trim().is_empty()) {
            Some(n) => n,
            None => random_nickname(&mut *self.nicknames.lock().await),
        };

        let (handle, events) = self
            .seat(room_id, player_id.clone(), nickname.clone(), None)
            .await?;
        info!(room = %room_id, player = %player_id, nickname = %nickname, "player joined");

        Ok(Joined {
            init: InitMessage {
                id: player_id.as_str().to_string(),
                room_id: room_id.as_str().to_string(),
                nickname,
            },
            events,
            handle,
        })
    }

    /// Seat a bot, creating the room if needed; returns the bot's id
    pub async fn add_bot(&self, room_id: &RoomId, difficulty: Difficulty) -> Result<PlayerId> {
        let nickname = random_nickname(&mut *self.nicknames.lock().await);
        let id = PlayerId::new(format!("bot-{}", self.bots.fetch_add(1, Ordering::Relaxed)));
        self.seat(
            room_id,
            id.clone(),
            format!("{nickname} (bot)"),
            Some(difficulty),
        )
        .await?;
        Ok(id)
    }

    /// Seat a player or bot. A room that closed after `open` handed it out is dropped
    /// from the map and a fresh one is opened in its place.
    async fn seat(
        &self,
        room_id: &RoomId,
        id: PlayerId,
        nickname: String,
        bot: Option<Difficulty>,
    ) -> Result<(RoomHandle, broadcast::Receiver<ServerMessage>)> {
        for _ in 0..SEAT_ATTEMPTS {
            let handle = self.open(room_id).await;
            let events = handle.subscribe();
            let seated = match bot {
                Some(difficulty) => {
                    handle
                        .add_bot(id.clone(), nickname.clone(), difficulty)
                        .await
                }
                None => handle.join(id.clone(), nickname.clone()).await,
            };
            match seated {
                Ok(result) => {
                    result.map_err(|e| anyhow!("{}: {}", e.code(), e))?;
                    return Ok((handle, events));
                }
                Err(AdapterError::RoomClosed) => {
                    debug!(room = %room_id, player = %id, "room closed before seating, reopening");
                    self.forget(room_id, &handle).await;
                }
            }
        }
        Err(AdapterError::RoomClosed.into())
    }

    pub async fn input(&self, room_id: &RoomId, player_id: PlayerId, action: &str) -> Result<()> {
        let handle = self
            .get(room_id)
            .await
            .ok_or_else(|| anyhow!("unknown room {room_id}"))?;
        handle.input(player_id, action).await?;
        Ok(())
    }

    pub async fn restart(&self, room_id: &RoomId) -> Result<()> {
        let handle = self
            .get(room_id)
            .await
            .ok_or_else(|| anyhow!("unknown room {room_id}"))?;
        handle.restart().await?;
        Ok(())
    }

    /// Remove a player; an emptied room is shut down and forgotten
    pub async fn leave(&self, room_id: &RoomId, player_id: PlayerId) -> Result<()> {
        let Some(handle) = self.get(room_id).await else {
            return Ok(());
        };
        let remaining = match handle.leave(player_id).await {
            Ok(remaining) => remaining,
            Err(AdapterError::RoomClosed) => 0,
        };
        if remaining > 0 {
            return Ok(());
        }

        // Someone may have been seated since the leave; the room task decides.
        match handle.close_if_empty().await {
            Ok(false) => {}
            Ok(true) | Err(AdapterError::RoomClosed) => self.forget(room_id, &handle).await,
        }
        Ok(())
    }

    /// Drop the map entry for a stopped room, unless it has already been replaced
    async fn forget(&self, room_id: &RoomId, handle: &RoomHandle) {
        let entry = {
            let mut rooms = self.rooms.lock().await;
            let stale = rooms
                .get(room_id)
                .is_some_and(|entry| entry.handle.same_room(handle));
            if stale {
                rooms.remove(room_id)
            } else {
                None
            }
        };
        let Some(entry) = entry else {
            return;
        };
        if let Err(e) = entry.task.await {
            warn!(room = %room_id, error = %e, "room task failed");
        }
        info!(room = %room_id, "room closed");
    }

    /// Stop every room task
    pub async fn shutdown(&self) {
        let entries: Vec<_> = self.rooms.lock().await.drain().collect();
        for (room_id, entry) in entries {
            let _ = entry.handle.shutdown().await;
            if let Err(e) = entry.task.await {
                warn!(room = %room_id, error = %e, "room task failed");
            }
        }
    }
}
