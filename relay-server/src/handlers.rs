use actix_web::{web, HttpResponse, Responder};

use crate::config::AppState;
use crate::types::HealthResponse;

pub(crate) async fn health(state: web::Data<AppState>) -> impl Responder {
    let registry = state.registry.read().await;
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy",
        service: "gridblast-relay",
        rooms: registry.len(),
        players: registry.player_count(),
        max_rooms: state.max_rooms,
        obstacle_count: state.layout.obstacle_count,
        bomb_fuse_ms: state.timings.bomb_fuse_ms,
        fire_lifetime_ms: state.timings.fire_lifetime_ms,
        bonus_lifetime_ms: state.timings.bonus_lifetime_ms,
    })
}
