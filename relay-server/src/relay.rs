//! Intent handling and room timers.
//!
//! Each handler takes the registry write lock once, applies one game
//! operation, and queues the resulting broadcasts before releasing it.
//! Timed transitions run as spawned tasks that sleep and then re-enter
//! through the same lock; their handles live in the room entry so that
//! cancellation (collected pickups, departing owners, closed rooms) is
//! an abort away.

use std::time::Duration;

use gridblast_core::{CellPos, PlayerId, ServerEvent};
use uuid::Uuid;

use crate::config::AppState;
use crate::registry::{PlayerSender, RoomEntry, TimerKey};

/// Random layout seed for a fresh room.
fn fresh_seed() -> u32 {
    let bytes = Uuid::new_v4().into_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Admit a player into `room_id`, opening the room on first join.
///
/// Returns whether the join was accepted; a refused join produces no
/// frames at all.
pub(crate) async fn join_room(
    state: &AppState,
    room_id: &str,
    player: PlayerId,
    sender: PlayerSender,
) -> bool {
    let mut registry = state.registry.write().await;
    if !registry.contains(room_id) {
        if registry.len() >= state.max_rooms {
            tracing::warn!(room = %room_id, max_rooms = state.max_rooms, "room cap reached, refusing join");
            return false;
        }
        let seed = fresh_seed();
        registry.open(room_id, seed, &state.layout);
        tracing::info!(room = %room_id, seed, "opened room");
    }
    let Some(entry) = registry.room_mut(room_id) else {
        return false;
    };

    let snapshot = match entry.game.add_player(player) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            tracing::debug!(player = %player, room = %room_id, "rejected join: {err}");
            return false;
        }
    };
    entry.insert_connection(player, sender);
    entry.send_to(
        player,
        &ServerEvent::RoomJoined {
            id: player,
            room_id: room_id.to_string(),
            seed: entry.game.seed(),
        },
    );
    entry.broadcast(&ServerEvent::UpdatePlayers {
        players: entry.game.snapshot_players(),
    });
    entry.broadcast(&ServerEvent::UpdateObstacles {
        obstacles: entry.game.obstacles().to_vec(),
    });
    tracing::info!(player = %player, room = %room_id, position = ?snapshot.position, "player joined");
    true
}

/// Apply a move intent and relay it to everyone else in the room.
pub(crate) async fn handle_move(state: &AppState, room_id: &str, player: PlayerId, position: CellPos) {
    let mut registry = state.registry.write().await;
    let Some(entry) = registry.room_mut(room_id) else {
        return;
    };
    let outcome = match entry.game.try_move(player, position) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::debug!(player = %player, room = %room_id, "rejected move: {err}");
            return;
        }
    };

    entry.broadcast_except(
        player,
        &ServerEvent::PlayerMoved {
            id: player,
            position: outcome.position,
        },
    );
    if let Some(bonus) = outcome.collected {
        entry.clear_timer(TimerKey::Bonus(bonus.id));
        entry.broadcast(&ServerEvent::BonusCollected {
            id: bonus.id,
            player,
            kind: bonus.kind,
        });
        entry.broadcast(&ServerEvent::UpdatePlayers {
            players: entry.game.snapshot_players(),
        });
    }
    if outcome.fatal {
        entry.broadcast(&ServerEvent::PlayerHit { id: player });
        entry.broadcast(&ServerEvent::UpdatePlayers {
            players: entry.game.snapshot_players(),
        });
    }
}

/// Apply a place-bomb intent and arm its fuse.
pub(crate) async fn handle_place_bomb(state: &AppState, room_id: &str, player: PlayerId) {
    let mut registry = state.registry.write().await;
    let Some(entry) = registry.room_mut(room_id) else {
        return;
    };
    let bomb = match entry.game.place_bomb(player) {
        Ok(bomb) => bomb,
        Err(err) => {
            tracing::debug!(player = %player, room = %room_id, "rejected bomb: {err}");
            return;
        }
    };
    entry.broadcast(&ServerEvent::BombPlaced {
        id: bomb.id,
        owner: player,
        position: bomb.position,
    });
    schedule_fuse(state, entry, room_id, bomb.id);
}

/// Tear down a departed player: cancel their fuses, announce the removed
/// bombs, and close the room once nobody is left.
pub(crate) async fn disconnect(state: &AppState, room_id: &str, player: PlayerId) {
    let mut registry = state.registry.write().await;
    let Some(entry) = registry.room_mut(room_id) else {
        return;
    };
    entry.remove_connection(player);
    if let Some(removed) = entry.game.remove_player(player) {
        for bomb_id in removed.cancelled_bombs {
            entry.clear_timer(TimerKey::Fuse(bomb_id));
            entry.broadcast(&ServerEvent::BombRemoved { id: bomb_id });
        }
        entry.broadcast(&ServerEvent::UpdatePlayers {
            players: entry.game.snapshot_players(),
        });
        tracing::info!(player = %player, room = %room_id, "player left");
    }
    if entry.game.is_empty() {
        registry.remove(room_id);
        tracing::info!(room = %room_id, "room closed");
    }
}

/// Fuse elapsed: detonate, announce, and arm the follow-up timers.
async fn detonate(state: AppState, room_id: String, bomb_id: u64) {
    let mut registry = state.registry.write().await;
    let Some(entry) = registry.room_mut(&room_id) else {
        return;
    };
    entry.complete_timer(TimerKey::Fuse(bomb_id));
    let outcome = match entry.game.detonate_bomb(bomb_id) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::debug!(room = %room_id, bomb = bomb_id, "fuse fired on a stale bomb: {err}");
            return;
        }
    };

    entry.broadcast(&ServerEvent::Explosion {
        id: outcome.id,
        origin: outcome.origin,
        fire: outcome.fire.clone(),
    });
    entry.broadcast(&ServerEvent::UpdateObstacles {
        obstacles: entry.game.obstacles().to_vec(),
    });
    for bonus in &outcome.spawned_bonuses {
        entry.broadcast(&ServerEvent::BonusSpawned { bonus: *bonus });
    }
    for hit in &outcome.hit_players {
        entry.broadcast(&ServerEvent::PlayerHit { id: *hit });
    }
    if !outcome.hit_players.is_empty() {
        entry.broadcast(&ServerEvent::UpdatePlayers {
            players: entry.game.snapshot_players(),
        });
    }

    schedule_blast_clear(&state, entry, &room_id, outcome.id);
    for bonus in &outcome.spawned_bonuses {
        schedule_bonus_expiry(&state, entry, &room_id, bonus.id);
    }
}

/// Fire lifetime elapsed: burn out the blast and release the owner slot.
async fn clear_blast(state: AppState, room_id: String, blast_id: u64) {
    let mut registry = state.registry.write().await;
    let Some(entry) = registry.room_mut(&room_id) else {
        return;
    };
    entry.complete_timer(TimerKey::Blast(blast_id));
    match entry.game.clear_blast(blast_id) {
        Ok(()) => entry.broadcast(&ServerEvent::BlastCleared { id: blast_id }),
        Err(err) => {
            tracing::debug!(room = %room_id, blast = blast_id, "stale blast timer: {err}")
        }
    }
}

/// Bonus lifetime elapsed: drop the pickup if it is still on the board.
async fn expire_bonus(state: AppState, room_id: String, bonus_id: u64) {
    let mut registry = state.registry.write().await;
    let Some(entry) = registry.room_mut(&room_id) else {
        return;
    };
    entry.complete_timer(TimerKey::Bonus(bonus_id));
    match entry.game.expire_bonus(bonus_id) {
        Ok(()) => entry.broadcast(&ServerEvent::BonusExpired { id: bonus_id }),
        Err(err) => {
            tracing::debug!(room = %room_id, bonus = bonus_id, "stale bonus timer: {err}")
        }
    }
}

// The schedule functions run with the registry write lock held, and the
// handle is recorded before the lock is released. The spawned task's
// first await is its sleep, and it re-acquires the lock afterwards, so
// it can never observe the room before the scheduling operation is done.

fn schedule_fuse(state: &AppState, entry: &mut RoomEntry, room_id: &str, bomb_id: u64) {
    let state = state.clone();
    let room_id = room_id.to_string();
    let fuse = Duration::from_millis(state.timings.bomb_fuse_ms);
    let handle = tokio::spawn(async move {
        tokio::time::sleep(fuse).await;
        detonate(state, room_id, bomb_id).await;
    });
    entry.set_timer(TimerKey::Fuse(bomb_id), handle);
}

fn schedule_blast_clear(state: &AppState, entry: &mut RoomEntry, room_id: &str, blast_id: u64) {
    let state = state.clone();
    let room_id = room_id.to_string();
    let lifetime = Duration::from_millis(state.timings.fire_lifetime_ms);
    let handle = tokio::spawn(async move {
        tokio::time::sleep(lifetime).await;
        clear_blast(state, room_id, blast_id).await;
    });
    entry.set_timer(TimerKey::Blast(blast_id), handle);
}

fn schedule_bonus_expiry(state: &AppState, entry: &mut RoomEntry, room_id: &str, bonus_id: u64) {
    let state = state.clone();
    let room_id = room_id.to_string();
    let lifetime = Duration::from_millis(state.timings.bonus_lifetime_ms);
    let handle = tokio::spawn(async move {
        tokio::time::sleep(lifetime).await;
        expire_bonus(state, room_id, bonus_id).await;
    });
    entry.set_timer(TimerKey::Bonus(bonus_id), handle);
}
