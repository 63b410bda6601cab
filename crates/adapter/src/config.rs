//! Adapter configuration from environment variables

use std::env;

use royale_room::{GarbageDelivery, RoomConfig};

use crate::types::BASE_GRAVITY_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Real-time step between room clock advances
    pub tick_ms: u64,
    /// State broadcast cadence
    pub snapshot_ms: u64,
    /// Command queue depth per room
    pub max_pending_commands: usize,
    pub room: RoomConfig,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            snapshot_ms: 33,
            max_pending_commands: 256,
            room: RoomConfig::default(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}

impl AdapterConfig {
    /// Read `ROYALE_*` variables, falling back to defaults for anything missing or invalid
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let tick_ms = parse_var::<u64>("ROYALE_TICK_MS")
            .filter(|&ms| ms > 0)
            .unwrap_or(defaults.tick_ms);
        let snapshot_ms = parse_var::<u64>("ROYALE_SNAPSHOT_MS")
            .filter(|&ms| ms > 0)
            .unwrap_or(defaults.snapshot_ms);
        let max_pending_commands = parse_var::<usize>("ROYALE_MAX_PENDING")
            .filter(|&n| n > 0)
            .unwrap_or(defaults.max_pending_commands);

        let gravity_ms = parse_var::<u32>("ROYALE_GRAVITY_MS")
            .filter(|&ms| ms > 0)
            .unwrap_or(BASE_GRAVITY_MS);
        let seed = parse_var::<u32>("ROYALE_SEED").unwrap_or(defaults.room.seed);
        let garbage_delivery = env::var("ROYALE_GARBAGE_DELIVERY")
            .ok()
            .and_then(|s| GarbageDelivery::from_str(s.trim()))
            .unwrap_or_default();

        Self {
            tick_ms,
            snapshot_ms,
            max_pending_commands,
            room: RoomConfig {
                gravity_ms,
                seed,
                garbage_delivery,
                ..defaults.room
            },
        }
    }

    /// Room config for the `index`-th room created, so rooms do not share a seed
    pub fn room_config(&self, index: u32) -> RoomConfig {
        RoomConfig {
            seed: self.room.seed.wrapping_add(index.wrapping_mul(0x9e37_79b9)),
            ..self.room
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_room_timing() {
        let config = AdapterConfig::default();
        assert_eq!(config.tick_ms, 16);
        assert_eq!(config.snapshot_ms, 33);
        assert_eq!(config.room.gravity_ms, BASE_GRAVITY_MS);
    }

    #[test]
    fn from_env_does_not_panic() {
        let config = AdapterConfig::from_env();
        assert!(config.tick_ms > 0);
        assert!(config.snapshot_ms > 0);
    }

    #[test]
    fn room_seeds_differ_per_room() {
        let config = AdapterConfig::default();
        assert_eq!(config.room_config(0).seed, config.room.seed);
        assert_ne!(config.room_config(1).seed, config.room_config(2).seed);
    }
}
