//! Wire protocol: closed tagged-variant event types.
//!
//! Every frame on the socket is one JSON object with a `type` tag and
//! camelCase fields. Anything that does not parse into these enums is
//! dropped at the relay edge. Server events carry full entity state so
//! clients merge by replacement, never by patching.

use serde::{Deserialize, Serialize};

use crate::types::{Bonus, BonusKind, CellPos, FireCell, Obstacle, PlayerId};

/// Count of collected pickups per kind, carried in player snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusTally {
    pub radius: u32,
    pub bombs: u32,
}

/// Wire view of one player, as carried by `updatePlayers`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub position: CellPos,
    pub blast_radius: u32,
    pub max_bombs: u32,
    pub active_bombs: u32,
    pub bonuses: BonusTally,
    pub alive: bool,
}

/// Client-to-server intents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    /// Enter a room, creating it on first join.
    JoinRoom { room_id: String },
    /// Move to a destination cell; the server validates and relays.
    PlayerMove {
        position: CellPos,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
    },
    /// Drop a bomb at the current cell.
    PlaceBomb,
}

/// Server-to-client events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Join acknowledgement, sent only to the joiner. Carries the layout
    /// seed so the client can regenerate the obstacle set locally.
    RoomJoined {
        id: PlayerId,
        room_id: String,
        seed: u32,
    },
    /// Full roster replacement.
    UpdatePlayers { players: Vec<PlayerSnapshot> },
    /// Full obstacle-set replacement.
    UpdateObstacles { obstacles: Vec<Obstacle> },
    /// One accepted move. Never echoed to the mover.
    PlayerMoved { id: PlayerId, position: CellPos },
    /// A bomb appeared on the board.
    BombPlaced {
        id: u64,
        owner: PlayerId,
        position: CellPos,
    },
    /// An unexploded bomb left the board with its owner.
    BombRemoved { id: u64 },
    /// A bomb detonated into these fire cells.
    Explosion {
        id: u64,
        origin: CellPos,
        fire: Vec<FireCell>,
    },
    /// An explosion's fire burnt out.
    BlastCleared { id: u64 },
    /// A pickup appeared on a vacated cell.
    BonusSpawned { bonus: Bonus },
    /// A player walked onto a pickup.
    BonusCollected {
        id: u64,
        player: PlayerId,
        kind: BonusKind,
    },
    /// An uncollected pickup timed out.
    BonusExpired { id: u64 },
    /// This player reached game-over.
    PlayerHit { id: PlayerId },
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    fn pid(n: u128) -> PlayerId {
        PlayerId(Uuid::from_u128(n))
    }

    #[test]
    fn client_events_use_camel_case_tags() {
        let join = serde_json::to_value(ClientEvent::JoinRoom {
            room_id: "room1".into(),
        })
        .unwrap();
        assert_eq!(join, json!({"type": "joinRoom", "roomId": "room1"}));

        let place = serde_json::to_value(ClientEvent::PlaceBomb).unwrap();
        assert_eq!(place, json!({"type": "placeBomb"}));
    }

    #[test]
    fn player_move_parses_with_and_without_room() {
        let bare: ClientEvent =
            serde_json::from_str(r#"{"type":"playerMove","position":{"x":100,"y":50}}"#).unwrap();
        assert_eq!(
            bare,
            ClientEvent::PlayerMove {
                position: CellPos::new(100, 50),
                room_id: None,
            }
        );

        let scoped: ClientEvent = serde_json::from_str(
            r#"{"type":"playerMove","position":{"x":0,"y":0},"roomId":"room1"}"#,
        )
        .unwrap();
        assert_eq!(
            scoped,
            ClientEvent::PlayerMove {
                position: CellPos::new(0, 0),
                room_id: Some("room1".into()),
            }
        );
    }

    #[test]
    fn malformed_client_frames_fail_to_parse() {
        assert!(serde_json::from_str::<ClientEvent>(r#"{"type":"fireLasers"}"#).is_err());
        assert!(serde_json::from_str::<ClientEvent>(r#"{"type":"joinRoom"}"#).is_err());
        assert!(serde_json::from_str::<ClientEvent>(r#"{"position":{"x":0,"y":0}}"#).is_err());
        assert!(serde_json::from_str::<ClientEvent>("not json").is_err());
    }

    #[test]
    fn bonus_kind_rides_under_type_key() {
        let event = ServerEvent::BonusSpawned {
            bonus: Bonus {
                id: 9,
                x: 150,
                y: 200,
                kind: BonusKind::Radius,
            },
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "bonusSpawned",
                "bonus": {"id": 9, "x": 150, "y": 200, "type": "radius"}
            })
        );
    }

    #[test]
    fn player_snapshot_field_names_are_camel_case() {
        let event = ServerEvent::UpdatePlayers {
            players: vec![PlayerSnapshot {
                id: pid(7),
                position: CellPos::new(0, 0),
                blast_radius: 3,
                max_bombs: 1,
                active_bombs: 0,
                bonuses: BonusTally::default(),
                alive: true,
            }],
        };
        let value = serde_json::to_value(&event).unwrap();
        let player = &value["players"][0];
        assert_eq!(player["blastRadius"], 3);
        assert_eq!(player["maxBombs"], 1);
        assert_eq!(player["activeBombs"], 0);
        assert_eq!(player["bonuses"], json!({"radius": 0, "bombs": 0}));
    }

    #[test]
    fn explosion_event_round_trips() {
        let event = ServerEvent::Explosion {
            id: 21,
            origin: CellPos::new(50, 50),
            fire: vec![
                FireCell { id: 22, x: 50, y: 50 },
                FireCell { id: 23, x: 50, y: 0 },
            ],
        };
        let text = serde_json::to_string(&event).unwrap();
        let back: ServerEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(back, event);
        assert!(text.starts_with(r#"{"type":"explosion""#));
    }
}
