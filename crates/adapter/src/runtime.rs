//! Runtime module - drives one room on a tokio task
//!
//! The room itself is synchronous and clock-free; this task owns it, feeds it commands
//! from an mpsc queue, advances its virtual clock by real elapsed time, and fans the
//! resulting messages out on a broadcast channel. Every subscriber of a room sees the
//! same ordered stream.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use royale_room::{PlayerView, Room, RoomError, RoomEvent};

use crate::config::AdapterConfig;
use crate::protocol::{event_message, state_message, LeaderboardMessage, ServerMessage};
use crate::store::{WinStore, LEADERBOARD_LEN};
use crate::types::{Difficulty, PlayerId};

/// Broadcast buffer; slow subscribers skip ahead rather than stall the room
const EVENT_BUFFER: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The room task has exited
    RoomClosed,
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::RoomClosed => write!(f, "room task is no longer running"),
        }
    }
}

impl std::error::Error for AdapterError {}

#[derive(Debug)]
pub enum RoomCommand {
    Join {
        id: PlayerId,
        nickname: String,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    AddBot {
        id: PlayerId,
        nickname: String,
        difficulty: Difficulty,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    /// Replies with the number of players left
    Leave {
        id: PlayerId,
        reply: oneshot::Sender<usize>,
    },
    Input {
        id: PlayerId,
        action: String,
    },
    Restart,
    SimulateAttack {
        target: PlayerId,
        lines: u32,
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<Vec<PlayerView>>,
    },
    /// Stop the task only if nobody is seated; replies whether it stopped
    Close {
        reply: oneshot::Sender<bool>,
    },
    Shutdown,
}

/// Cloneable sender side of a running room
#[derive(Debug, Clone)]
pub struct RoomHandle {
    commands: mpsc::Sender<RoomCommand>,
    events: broadcast::Sender<ServerMessage>,
}

impl RoomHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.events.subscribe()
    }

    /// True when both handles drive the same room task
    pub fn same_room(&self, other: &RoomHandle) -> bool {
        self.commands.same_channel(&other.commands)
    }

    async fn send(&self, command: RoomCommand) -> Result<(), AdapterError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| AdapterError::RoomClosed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RoomCommand,
    ) -> Result<T, AdapterError> {
        let (reply, rx) = oneshot::channel();
        self.send(build(reply)).await?;
        rx.await.map_err(|_| AdapterError::RoomClosed)
    }

    pub async fn join(
        &self,
        id: PlayerId,
        nickname: String,
    ) -> Result<Result<(), RoomError>, AdapterError> {
        self.request(|reply| RoomCommand::Join {
            id,
            nickname,
            reply,
        })
        .await
    }

    pub async fn add_bot(
        &self,
        id: PlayerId,
        nickname: String,
        difficulty: Difficulty,
    ) -> Result<Result<(), RoomError>, AdapterError> {
        self.request(|reply| RoomCommand::AddBot {
            id,
            nickname,
            difficulty,
            reply,
        })
        .await
    }

    pub async fn leave(&self, id: PlayerId) -> Result<usize, AdapterError> {
        self.request(|reply| RoomCommand::Leave { id, reply }).await
    }

    pub async fn input(&self, id: PlayerId, action: impl Into<String>) -> Result<(), AdapterError> {
        self.send(RoomCommand::Input {
            id,
            action: action.into(),
        })
        .await
    }

    pub async fn restart(&self) -> Result<(), AdapterError> {
        self.send(RoomCommand::Restart).await
    }

    pub async fn simulate_attack(&self, target: PlayerId, lines: u32) -> Result<bool, AdapterError> {
        self.request(|reply| RoomCommand::SimulateAttack {
            target,
            lines,
            reply,
        })
        .await
    }

    pub async fn snapshot(&self) -> Result<Vec<PlayerView>, AdapterError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }

    /// Commands are handled in order, so a seat queued ahead of this keeps the room open
    pub async fn close_if_empty(&self) -> Result<bool, AdapterError> {
        self.request(|reply| RoomCommand::Close { reply }).await
    }

    pub async fn shutdown(&self) -> Result<(), AdapterError> {
        self.send(RoomCommand::Shutdown).await
    }
}

/// Spawn the task that owns `room`
pub fn spawn_room(
    room: Room,
    config: &AdapterConfig,
    store: Arc<dyn WinStore>,
) -> (RoomHandle, JoinHandle<()>) {
    let (commands_tx, commands_rx) = mpsc::channel(config.max_pending_commands);
    let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
    let handle = RoomHandle {
        commands: commands_tx,
        events: events_tx.clone(),
    };
    let task = tokio::spawn(run_room(
        room,
        config.clone(),
        store,
        commands_rx,
        events_tx,
    ));
    (handle, task)
}

async fn run_room(
    mut room: Room,
    config: AdapterConfig,
    store: Arc<dyn WinStore>,
    mut commands: mpsc::Receiver<RoomCommand>,
    events: broadcast::Sender<ServerMessage>,
) {
    let mut tick = time::interval(Duration::from_millis(config.tick_ms));
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut snapshot = time::interval(Duration::from_millis(config.snapshot_ms));
    snapshot.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();

    info!(room = %room.id(), "room task started");
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                None | Some(RoomCommand::Shutdown) => break,
                Some(RoomCommand::Close { reply }) => {
                    let empty = room.is_empty();
                    let _ = reply.send(empty);
                    if empty {
                        break;
                    }
                }
                Some(command) => apply_command(&mut room, command),
            },
            _ = tick.tick() => {
                let now = Instant::now();
                let elapsed = now.duration_since(last).as_millis() as u64;
                last = now;
                room.advance(elapsed);
            }
            _ = snapshot.tick(), if !room.is_empty() => {
                let _ = events.send(state_message(&room.snapshot()));
            }
        }
        publish_events(&mut room, store.as_ref(), &events);
    }
    room.stop();
    info!(room = %room.id(), "room task stopped");
}

fn apply_command(room: &mut Room, command: RoomCommand) {
    match command {
        RoomCommand::Join { id, nickname, reply } => {
            let result = room.add_player(id, nickname);
            start_on_first_seat(room, &result);
            let _ = reply.send(result);
        }
        RoomCommand::AddBot {
            id,
            nickname,
            difficulty,
            reply,
        } => {
            let result = room.add_bot(id, nickname, difficulty);
            start_on_first_seat(room, &result);
            let _ = reply.send(result);
        }
        RoomCommand::Leave { id, reply } => {
            if let Err(e) = room.remove_player(&id) {
                debug!(room = %room.id(), code = e.code(), "leave ignored");
            }
            let _ = reply.send(room.len());
        }
        RoomCommand::Input { id, action } => {
            if let Err(e) = room.handle_raw_input(&id, &action) {
                debug!(room = %room.id(), player = %id, code = e.code(), "input ignored");
            }
        }
        RoomCommand::Restart => room.restart(),
        RoomCommand::SimulateAttack {
            target,
            lines,
            reply,
        } => {
            let _ = reply.send(room.simulate_attack(&target, lines));
        }
        RoomCommand::Snapshot { reply } => {
            let _ = reply.send(room.snapshot());
        }
        RoomCommand::Close { reply } => {
            let _ = reply.send(false);
        }
        RoomCommand::Shutdown => {}
    }
}

/// A fresh room starts with its first player; after a win it waits for a restart
fn start_on_first_seat(room: &mut Room, result: &Result<(), RoomError>) {
    if result.is_ok() && room.len() == 1 && !room.is_running() {
        room.start();
    }
}

/// Drain the room outbox onto the broadcast channel, recording wins as they happen
fn publish_events(
    room: &mut Room,
    store: &dyn WinStore,
    events: &broadcast::Sender<ServerMessage>,
) {
    for event in room.drain_events() {
        let _ = events.send(event_message(&event));
        let RoomEvent::Winner { winner } = &event else {
            continue;
        };
        let Some(name) = room.player(winner).map(|p| p.name().to_string()) else {
            continue;
        };
        match store
            .increment_wins(&name)
            .and_then(|_| store.leaderboard(LEADERBOARD_LEN))
        {
            Ok(entries) => {
                let _ = events.send(ServerMessage::Leaderboard(LeaderboardMessage { entries }));
            }
            Err(e) => warn!(room = %room.id(), error = %e, "failed to record win"),
        }
    }
}
