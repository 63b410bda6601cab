//! Events raised by a room for the transport layer

use royale_core::DropInfo;

use crate::types::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// Raised when the attack is sent; delivery follows after the garbage delay
    Attack {
        attacker: PlayerId,
        target: PlayerId,
        lines: u32,
    },
    /// Final position of a hard-dropped piece
    HardDrop { player: PlayerId, drop: DropInfo },
    Eliminated {
        player: PlayerId,
        rank: usize,
        killer: Option<PlayerId>,
    },
    Winner { winner: PlayerId },
    /// Every remaining player was eliminated on the same tick
    NoSurvivors,
    Restarted,
}

impl RoomEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::Attack { .. } => "attack",
            RoomEvent::HardDrop { .. } => "hardDrop",
            RoomEvent::Eliminated { .. } => "eliminated",
            RoomEvent::Winner { .. } => "winner",
            RoomEvent::NoSurvivors => "noSurvivors",
            RoomEvent::Restarted => "restarted",
        }
    }
}
