//! One task per socket: parsed intents in, queued broadcasts out.

use std::sync::Arc;

use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_ws::{AggregatedMessage, AggregatedMessageStream, Session};
use bytestring::ByteString;
use futures_util::StreamExt as _;
use gridblast_core::{ClientEvent, PlayerId};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::AppState;
use crate::registry::{PlayerSender, SEND_QUEUE_DEPTH};
use crate::relay;

/// Upgrade handler: mints the player id and detaches the session task.
pub(crate) async fn ws_route(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (response, session, stream) = actix_ws::handle(&req, body)?;
    let player = PlayerId(Uuid::new_v4());
    tracing::info!(player = %player, "socket connected");
    actix_web::rt::spawn(run_session(
        state.into_inner(),
        session,
        stream.aggregate_continuations(),
        player,
    ));
    Ok(response)
}

async fn run_session(
    state: Arc<AppState>,
    mut session: Session,
    mut stream: AggregatedMessageStream,
    player: PlayerId,
) {
    let (tx, mut rx) = mpsc::channel::<ByteString>(SEND_QUEUE_DEPTH);
    let mut joined_room: Option<String> = None;

    loop {
        tokio::select! {
            Some(payload) = rx.recv() => {
                if session.text(payload).await.is_err() {
                    break;
                }
            }
            message = stream.next() => {
                match message {
                    Some(Ok(AggregatedMessage::Text(text))) => {
                        dispatch(&state, &mut joined_room, player, &tx, &text).await;
                    }
                    Some(Ok(AggregatedMessage::Ping(bytes))) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(AggregatedMessage::Pong(_))) => {}
                    Some(Ok(AggregatedMessage::Binary(_))) => {
                        tracing::debug!(player = %player, "ignoring binary frame");
                    }
                    Some(Ok(AggregatedMessage::Close(_))) | Some(Err(_)) | None => break,
                }
            }
        }
    }

    if let Some(room_id) = joined_room {
        relay::disconnect(&state, &room_id, player).await;
    }
    let _ = session.close(None).await;
    tracing::info!(player = %player, "socket disconnected");
}

/// Parse one inbound frame and route it. Frames that do not parse, and
/// intents sent before a join, are dropped without a reply.
async fn dispatch(
    state: &AppState,
    joined_room: &mut Option<String>,
    player: PlayerId,
    sender: &PlayerSender,
    raw: &str,
) {
    let event = match serde_json::from_str::<ClientEvent>(raw) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(player = %player, "discarding malformed frame: {err}");
            return;
        }
    };
    match event {
        ClientEvent::JoinRoom { room_id } => {
            if joined_room.is_some() {
                tracing::warn!(player = %player, "ignoring join while already in a room");
                return;
            }
            if relay::join_room(state, &room_id, player, sender.clone()).await {
                *joined_room = Some(room_id);
            }
        }
        // The session's room wins over any roomId carried in the frame.
        ClientEvent::PlayerMove { position, .. } => {
            let Some(room_id) = joined_room.as_deref() else {
                tracing::warn!(player = %player, "ignoring move before a join");
                return;
            };
            relay::handle_move(state, room_id, player, position).await;
        }
        ClientEvent::PlaceBomb => {
            let Some(room_id) = joined_room.as_deref() else {
                tracing::warn!(player = %player, "ignoring bomb before a join");
                return;
            };
            relay::handle_place_bomb(state, room_id, player).await;
        }
    }
}
