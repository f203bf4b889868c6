//! Room table: per-room game state, connected sockets, and timer handles.
//!
//! The registry is owned by `AppState` behind one `RwLock`. Every relay
//! operation takes the write lock, mutates one room, and queues outbound
//! frames without awaiting, so room state never tears mid-operation.

use std::collections::HashMap;

use bytestring::ByteString;
use gridblast_core::{Game, LayoutParams, PlayerId, ServerEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Outbound frame queue for one socket. The session task drains it; a
/// full queue drops frames rather than stalling the room.
pub(crate) type PlayerSender = mpsc::Sender<ByteString>;

pub(crate) const SEND_QUEUE_DEPTH: usize = 256;

/// Identity of one scheduled room timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum TimerKey {
    /// Bomb fuse, keyed by bomb id.
    Fuse(u64),
    /// Fire burn-out, keyed by explosion id.
    Blast(u64),
    /// Pickup expiry, keyed by bonus id.
    Bonus(u64),
}

pub(crate) struct RoomEntry {
    pub(crate) game: Game,
    connections: HashMap<PlayerId, PlayerSender>,
    timers: HashMap<TimerKey, JoinHandle<()>>,
}

impl RoomEntry {
    fn new(seed: u32, layout: &LayoutParams) -> Self {
        Self {
            game: Game::with_params(seed, layout),
            connections: HashMap::new(),
            timers: HashMap::new(),
        }
    }

    pub(crate) fn insert_connection(&mut self, player: PlayerId, sender: PlayerSender) {
        self.connections.insert(player, sender);
    }

    pub(crate) fn remove_connection(&mut self, player: PlayerId) {
        self.connections.remove(&player);
    }

    /// Queue one event for every socket in the room.
    pub(crate) fn broadcast(&self, event: &ServerEvent) {
        let Some(payload) = encode(event) else { return };
        for (player, sender) in &self.connections {
            deliver(*player, sender, payload.clone());
        }
    }

    /// Queue one event for every socket except `skip`.
    pub(crate) fn broadcast_except(&self, skip: PlayerId, event: &ServerEvent) {
        let Some(payload) = encode(event) else { return };
        for (player, sender) in &self.connections {
            if *player != skip {
                deliver(*player, sender, payload.clone());
            }
        }
    }

    /// Queue one event for a single socket.
    pub(crate) fn send_to(&self, player: PlayerId, event: &ServerEvent) {
        let Some(payload) = encode(event) else { return };
        if let Some(sender) = self.connections.get(&player) {
            deliver(player, sender, payload);
        }
    }

    /// Record a scheduled timer. Ids are room-unique, so keys never collide.
    pub(crate) fn set_timer(&mut self, key: TimerKey, handle: JoinHandle<()>) {
        self.timers.insert(key, handle);
    }

    /// Cancel a pending timer before it fires.
    pub(crate) fn clear_timer(&mut self, key: TimerKey) {
        if let Some(handle) = self.timers.remove(&key) {
            handle.abort();
        }
    }

    /// Forget a timer that has fired; its task is already finishing.
    pub(crate) fn complete_timer(&mut self, key: TimerKey) {
        self.timers.remove(&key);
    }

    #[cfg(test)]
    fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for RoomEntry {
    fn drop(&mut self) {
        for handle in self.timers.values() {
            handle.abort();
        }
    }
}

fn encode(event: &ServerEvent) -> Option<ByteString> {
    match serde_json::to_string(event) {
        Ok(json) => Some(ByteString::from(json)),
        Err(err) => {
            tracing::error!("failed to encode server event: {err}");
            None
        }
    }
}

fn deliver(player: PlayerId, sender: &PlayerSender, payload: ByteString) {
    if let Err(err) = sender.try_send(payload) {
        tracing::debug!(player = %player, "dropping frame for slow client: {err}");
    }
}

#[derive(Default)]
pub(crate) struct RoomRegistry {
    rooms: HashMap<String, RoomEntry>,
}

impl RoomRegistry {
    pub(crate) fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub(crate) fn room_mut(&mut self, room_id: &str) -> Option<&mut RoomEntry> {
        self.rooms.get_mut(room_id)
    }

    pub(crate) fn open(&mut self, room_id: &str, seed: u32, layout: &LayoutParams) -> &mut RoomEntry {
        self.rooms
            .entry(room_id.to_string())
            .or_insert_with(|| RoomEntry::new(seed, layout))
    }

    /// Drop a room outright; pending timers are aborted with it.
    pub(crate) fn remove(&mut self, room_id: &str) {
        self.rooms.remove(room_id);
    }

    pub(crate) fn len(&self) -> usize {
        self.rooms.len()
    }

    pub(crate) fn player_count(&self) -> usize {
        self.rooms.values().map(|room| room.game.player_count()).sum()
    }
}
