use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) service: &'static str,
    pub(crate) rooms: usize,
    pub(crate) players: usize,
    pub(crate) max_rooms: usize,
    pub(crate) obstacle_count: usize,
    pub(crate) bomb_fuse_ms: u64,
    pub(crate) fire_lifetime_ms: u64,
    pub(crate) bonus_lifetime_ms: u64,
}
