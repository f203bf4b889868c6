mod config;
mod handlers;
mod registry;
mod relay;
mod session;
mod types;

use std::env;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

use crate::config::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let state = AppState::from_env();

    tracing::info!(
        "starting gridblast relay: bind_addr={} max_rooms={} obstacle_count={} bomb_fuse_ms={} fire_lifetime_ms={} bonus_lifetime_ms={}",
        bind_addr,
        state.max_rooms,
        state.layout.obstacle_count,
        state.timings.bomb_fuse_ms,
        state.timings.fire_lifetime_ms,
        state.timings.bonus_lifetime_ms
    );

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(handlers::health))
            .route("/ws", web::get().to(session::ws_route))
    })
    .bind(bind_addr)?
    .run()
    .await
}
