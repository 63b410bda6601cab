//! Room configuration

use royale_core::BoardConfig;

use crate::types::{
    BASE_GRAVITY_MS, GARBAGE_DELAY_MS, LOCK_DELAY_MS, LOGIC_TICK_MS, MAX_LOCK_RESETS,
};

/// How delivered garbage reaches the target board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GarbageDelivery {
    /// Rows are pushed into the target grid when the delay elapses
    #[default]
    Immediate,
    /// Lines join the target's buffer and land on its next non-clearing lock
    Buffered,
}

impl GarbageDelivery {
    /// Parse `immediate` / `buffered`; anything else is `None`
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "immediate" => Some(GarbageDelivery::Immediate),
            "buffered" => Some(GarbageDelivery::Buffered),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GarbageDelivery::Immediate => "immediate",
            GarbageDelivery::Buffered => "buffered",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomConfig {
    /// Gravity cycle period; constant for the whole match
    pub gravity_ms: u32,
    pub logic_tick_ms: u32,
    /// Delay between an attack event and garbage delivery
    pub garbage_delay_ms: u32,
    pub lock_delay_ms: Option<u32>,
    pub max_lock_resets: u8,
    pub garbage_delivery: GarbageDelivery,
    /// Seeds every board and every random targeting decision in the room
    pub seed: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            gravity_ms: BASE_GRAVITY_MS,
            logic_tick_ms: LOGIC_TICK_MS,
            garbage_delay_ms: GARBAGE_DELAY_MS,
            lock_delay_ms: Some(LOCK_DELAY_MS),
            max_lock_resets: MAX_LOCK_RESETS,
            garbage_delivery: GarbageDelivery::default(),
            seed: 1,
        }
    }
}

impl RoomConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn board_config(&self) -> BoardConfig {
        BoardConfig {
            lock_delay_ms: self.lock_delay_ms,
            max_lock_resets: self.max_lock_resets,
        }
    }
}
