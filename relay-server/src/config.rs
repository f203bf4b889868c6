use std::{env, sync::Arc};

use gridblast_core::constants::{BOMB_FUSE_MS, BONUS_LIFETIME_MS, FIRE_LIFETIME_MS, OBSTACLE_COUNT};
use gridblast_core::LayoutParams;
use tokio::sync::RwLock;

use crate::registry::RoomRegistry;

pub(crate) const DEFAULT_MAX_ROOMS: usize = 64;

/// Millisecond schedule for the three room timers. Env-tunable so tests
/// and local clients can run on short clocks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GameTimings {
    pub(crate) bomb_fuse_ms: u64,
    pub(crate) fire_lifetime_ms: u64,
    pub(crate) bonus_lifetime_ms: u64,
}

impl GameTimings {
    pub(crate) fn from_env() -> Self {
        Self {
            bomb_fuse_ms: read_env_u64("BOMB_FUSE_MS", BOMB_FUSE_MS),
            fire_lifetime_ms: read_env_u64("FIRE_LIFETIME_MS", FIRE_LIFETIME_MS),
            bonus_lifetime_ms: read_env_u64("BONUS_LIFETIME_MS", BONUS_LIFETIME_MS),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) registry: Arc<RwLock<RoomRegistry>>,
    pub(crate) timings: GameTimings,
    pub(crate) layout: LayoutParams,
    pub(crate) max_rooms: usize,
}

impl AppState {
    pub(crate) fn from_env() -> Self {
        Self {
            registry: Arc::new(RwLock::new(RoomRegistry::default())),
            timings: GameTimings::from_env(),
            layout: LayoutParams {
                obstacle_count: read_env_usize("OBSTACLE_COUNT", OBSTACLE_COUNT),
            },
            max_rooms: read_env_usize("MAX_ROOMS", DEFAULT_MAX_ROOMS),
        }
    }
}

pub(crate) fn read_env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub(crate) fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
