//! Headless battle-royale simulation (default binary).
//!
//! Seats `ROYALE_BOTS` bots in one room and prints every outbound protocol message as a
//! JSON line on stdout until the match is decided or `ROYALE_MAX_SECS` elapses.
//! Logs go to stderr; `RUST_LOG` overrides the default `info` filter.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use royale_tetris::adapter::{encode, AdapterConfig, MemoryWinStore, RoomRegistry, ServerMessage};
use royale_tetris::types::{Difficulty, RoomId};

#[derive(Debug, Clone)]
struct SimConfig {
    bots: usize,
    difficulty: Difficulty,
    room: String,
    max_secs: u64,
}

impl SimConfig {
    fn from_env() -> Self {
        let bots = env::var("ROYALE_BOTS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(4);
        let difficulty = env::var("ROYALE_DIFFICULTY")
            .map(|s| Difficulty::from_str_lossy(&s))
            .unwrap_or_default();
        let room = env::var("ROYALE_ROOM").unwrap_or_else(|_| "sim".to_string());
        let max_secs = env::var("ROYALE_MAX_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(120);

        Self {
            bots,
            difficulty,
            room,
            max_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let sim = SimConfig::from_env();
    let registry = RoomRegistry::new(AdapterConfig::from_env(), Arc::new(MemoryWinStore::new()));
    let room_id = RoomId::new(sim.room.clone());

    let handle = registry.open(&room_id).await;
    let mut events = handle.subscribe();
    for _ in 0..sim.bots {
        registry.add_bot(&room_id, sim.difficulty).await?;
    }
    info!(room = %room_id, bots = sim.bots, difficulty = sim.difficulty.as_str(), "simulation started");

    let deadline = tokio::time::sleep(Duration::from_secs(sim.max_secs));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => {
                info!("time limit reached");
                break;
            }
            message = events.recv() => match message {
                Ok(message) => {
                    println!("{}", encode(&message)?);
                    match message {
                        ServerMessage::GameWinner(ref winner) if winner.winner_id.is_none() => break,
                        ServerMessage::Leaderboard(_) => break,
                        _ => {}
                    }
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "output fell behind"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    registry.shutdown().await;
    info!("simulation finished");
    Ok(())
}
